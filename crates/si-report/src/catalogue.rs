//! The fixed catalogue of reports.
//!
//! Every table is a list of [`RegressionSpec`]s plus a [`TableOptions`]
//! layout; the specification lists are generated with [`NestedSpecs`].

use std::fmt;
use std::str::FromStr;

use si_core::{CovarianceType, Error, Result, RowFilter};
use si_inference::{INTERCEPT, OlsResult};

use crate::comparison::{TableOptions, TableStyle, comparison_table};
use crate::labels::VariableCatalogue;
use crate::prepare::{
    COUNTRY_BASE_SAMPLE, REGION_BASE_SAMPLE, StudyData, prepare_country_data, prepare_region_data,
    summary_statistics,
};
use crate::runner::{Fit, fit_all};
use crate::spec::{Estimator, NestedSpecs, RegressionSpec, interleave};
use crate::table::{Report, RowKind, Table};

const CONTINENTS: [&str; 3] = ["africa", "america", "asia"];
const GEOGRAPHY: [&str; 3] = ["invdistcoast", "invdis2", "landlocked"];
const TEMPERATURE: [&str; 2] = ["temp_avg", "temp2"];
const CLIMATE: [&str; 9] =
    ["temp1", "temp2", "temp3", "temp4", "temp5", "humid1", "humid2", "humid3", "humid4"];
const RELIGION: [&str; 3] = ["cath1900", "prot1900", "musl1900"];

const SCHOOLING_INSTRUMENTS: [&str; 2] = ["prienr1900", "protmiss"];
const SETTLER_INSTRUMENTS: [&str; 2] = ["lcapped", "lpd1500s"];
const ALL_INSTRUMENTS: [&str; 4] = ["lcapped", "lpd1500s", "prienr1900", "protmiss"];

const OLS_NOTE: &str = "These are OLS regressions with one observation per country";
const ROBUST_NOTE: &str = "Standard errors robust against heteroscedasticity are in parentheses";
const TWO_STEP_NOTE: &str =
    "Second-stage standard errors are those of the OLS regression on first-stage fitted values";
const OVERID_NOTE: &str = "Over-identification p-values are from the Wooldridge score test of the direct 2SLS fit";

/// Identifier of a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportId {
    Table1,
    Table2,
    Table3,
    Table4,
    Table4Liml,
    Table5,
    Table5Liml,
    Table6,
    Table6Liml,
    Table7,
    Table8,
    Table8Liml,
    Table9,
    Table10,
    Figure1,
}

impl ReportId {
    /// Every entry, in catalogue order.
    pub const ALL: [ReportId; 15] = [
        ReportId::Table1,
        ReportId::Table2,
        ReportId::Table3,
        ReportId::Table4,
        ReportId::Table4Liml,
        ReportId::Table5,
        ReportId::Table5Liml,
        ReportId::Table6,
        ReportId::Table6Liml,
        ReportId::Table7,
        ReportId::Table8,
        ReportId::Table8Liml,
        ReportId::Table9,
        ReportId::Table10,
        ReportId::Figure1,
    ];

    /// Command-line name.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportId::Table1 => "table1",
            ReportId::Table2 => "table2",
            ReportId::Table3 => "table3",
            ReportId::Table4 => "table4",
            ReportId::Table4Liml => "table4-liml",
            ReportId::Table5 => "table5",
            ReportId::Table5Liml => "table5-liml",
            ReportId::Table6 => "table6",
            ReportId::Table6Liml => "table6-liml",
            ReportId::Table7 => "table7",
            ReportId::Table8 => "table8",
            ReportId::Table8Liml => "table8-liml",
            ReportId::Table9 => "table9",
            ReportId::Table10 => "table10",
            ReportId::Figure1 => "figure1",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            ReportId::Table1 => "Summary statistics, cross-country and cross-region samples",
            ReportId::Table2 => "OLS of income on schooling and rule of law",
            ReportId::Table3 => "Falsification: Protestant missionaries and earlier enrollment",
            ReportId::Table4 => "2SLS of income on schooling (enrollment 1900, Protestant missions)",
            ReportId::Table4Liml => "LIML counterpart of table 4, settler-mortality controls",
            ReportId::Table5 => "2SLS of income on rule of law (settler mortality, population density 1500)",
            ReportId::Table5Liml => "LIML counterpart of table 5, schooling-instrument controls",
            ReportId::Table6 => "2SLS of income on schooling and rule of law, four instruments",
            ReportId::Table6Liml => "LIML counterpart of table 6",
            ReportId::Table7 => "LIML robustness: neo-Europes, malaria, climate, religion",
            ReportId::Table8 => "2SLS of rule of law on schooling",
            ReportId::Table8Liml => "LIML counterpart of table 8, settler-mortality controls",
            ReportId::Table9 => "Cross-region OLS with country fixed effects",
            ReportId::Table10 => "Cross-region 2SLS with country fixed effects",
            ReportId::Figure1 => "Scatter plots of income, schooling and rule of law",
        }
    }

    /// Whether the report reads the region table.
    pub fn needs_region(self) -> bool {
        matches!(self, ReportId::Table9 | ReportId::Table10)
    }

    /// Whether the report is a figure rather than a table.
    pub fn is_figure(self) -> bool {
        matches!(self, ReportId::Figure1)
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        ReportId::ALL
            .into_iter()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| Error::Validation(format!("unknown report: {s}")))
    }
}

/// Build table report `id` from the study inputs.
pub fn build_report(id: ReportId, data: &StudyData, style: &TableStyle) -> Result<Report> {
    let c = Catalogue { data, style, labels: VariableCatalogue::standard() };
    let panels = match id {
        ReportId::Table1 => vec![c.table1()?],
        ReportId::Table2 => vec![c.table2()?],
        ReportId::Table3 => vec![c.table3()?],
        ReportId::Table4 => c.table4()?,
        ReportId::Table4Liml => vec![c.liml("Table 4, LIML estimates", table4_specs(), 4)?],
        ReportId::Table5 => c.table5()?,
        ReportId::Table5Liml => vec![c.liml("Table 5, LIML estimates", table5_specs(), 4)?],
        ReportId::Table6 => c.table6()?,
        ReportId::Table6Liml => vec![c.liml("Table 6, LIML estimates", table6_specs(), 4)?],
        ReportId::Table7 => vec![c.table7()?],
        ReportId::Table8 => vec![c.table8()?],
        ReportId::Table8Liml => vec![c.liml("Table 8, LIML estimates", table8_specs(), 4)?],
        ReportId::Table9 => vec![c.table9()?],
        ReportId::Table10 => c.table10()?,
        ReportId::Figure1 => {
            return Err(Error::Validation("figure1 is a figure, not a table".into()));
        }
    };
    tracing::info!(report = %id, panels = panels.len(), "built report");
    Ok(Report { id: id.to_string(), panels })
}

/// Nested IV groups: one group per base, each extended by the same blocks.
fn iv_groups(
    dependent: &str,
    endog: &[&str],
    instruments: &[&str],
    bases: &[&[&str]],
    blocks: &[&[&str]],
    estimator: Estimator,
) -> Vec<RegressionSpec> {
    bases
        .iter()
        .flat_map(|base| NestedSpecs::iv(dependent, *base, endog, instruments, estimator).blocks(blocks).build())
        .collect()
}

fn table2_specs() -> Vec<RegressionSpec> {
    let nested = |keys: &[&str]| {
        NestedSpecs::ols("logpgdp05", keys, CovarianceType::HC3)
            .blocks(&[&["lat_abst"], &CONTINENTS, &["f_brit", "f_french"]])
            .build()
    };
    interleave(vec![nested(&["tyr05_n"]), nested(&["ruleoflaw"]), nested(&["tyr05_n", "ruleoflaw"])])
}

fn table3_specs() -> Vec<RegressionSpec> {
    let nested = |dependent: &str| {
        NestedSpecs::ols(dependent, &["protmiss"], CovarianceType::HC1)
            .blocks(&[&["lat_abst"], &["africa", "america"], &["f_french", "f_brit"]])
    };
    let mut specs = nested("prienr1870").build();
    specs.extend(nested("prienr1940").build());
    specs.extend(
        nested("tyr05_n")
            .map(|s| s.with_filters(vec![RowFilter::lt("Yrsmis60", 90.0), RowFilter::ne("protmiss", 0.0)]))
            .build(),
    );
    specs
}

fn table4_specs() -> Vec<RegressionSpec> {
    schooling_on_income("logpgdp05")
}

fn table8_specs() -> Vec<RegressionSpec> {
    schooling_on_income("ruleoflaw")
}

fn schooling_on_income(dependent: &str) -> Vec<RegressionSpec> {
    iv_groups(
        dependent,
        &["tyr05_n"],
        &SCHOOLING_INSTRUMENTS,
        &[&["dummy_dennis"], &["dummy_dennis", "lcapped", "lpd1500s"]],
        &[&["lat_abst"], &CONTINENTS, &["f_french", "f_brit"]],
        Estimator::TwoStepOls(CovarianceType::HC3),
    )
}

fn table5_specs() -> Vec<RegressionSpec> {
    iv_groups(
        "logpgdp05",
        &["ruleoflaw"],
        &SETTLER_INSTRUMENTS,
        &[&[], &["dummy_dennis", "prienr1900", "protmiss"]],
        &[&["lat_abst"], &CONTINENTS, &["f_french", "f_brit"]],
        Estimator::TwoStepOls(CovarianceType::HC3),
    )
}

fn table6_specs() -> Vec<RegressionSpec> {
    iv_groups(
        "logpgdp05",
        &["tyr05_n", "ruleoflaw"],
        &ALL_INSTRUMENTS,
        &[&["dummy_dennis"]],
        &[&["lat_abst"], &CONTINENTS, &["f_brit", "f_french"]],
        Estimator::TwoStepOls(CovarianceType::HC3),
    )
}

fn table7_specs() -> Vec<RegressionSpec> {
    let liml = Estimator::Liml(CovarianceType::HC0);
    let endog = ["ruleoflaw", "tyr05_n"];
    let pair = |controls: Vec<&str>| -> [RegressionSpec; 2] {
        let mut base = vec!["dummy_dennis", "lat_abst", "africa", "america", "asia"];
        base.extend(controls);
        let mut colonies = base.clone();
        colonies.extend(["f_brit", "f_french"]);
        [
            RegressionSpec::iv("logpgdp05", &base, &endog, &ALL_INSTRUMENTS, liml),
            RegressionSpec::iv("logpgdp05", &colonies, &endog, &ALL_INSTRUMENTS, liml),
        ]
    };
    let mut specs = Vec::with_capacity(8);
    specs.extend(
        pair(Vec::new()).map(|s| s.without_intercept().with_filters(vec![RowFilter::eq("neoeuropes", 0.0)])),
    );
    specs.extend(pair(vec!["malfal94"]));
    specs.extend(pair(CLIMATE.to_vec()));
    specs.extend(pair(RELIGION.to_vec()));
    specs
}

fn table9_specs() -> Vec<RegressionSpec> {
    let first = RegressionSpec::ols("lgdp", &["yearsed"], CovarianceType::HC3).with_fixed_effects("bbb");
    let mut specs = vec![first];
    specs.extend(
        NestedSpecs::ols("lgdp", &["yearsed"], CovarianceType::HC3)
            .map(|s| s.with_fixed_effects("bbb").requiring(&["capital_old"]))
            .blocks(&[&["capital_old"], &GEOGRAPHY, &TEMPERATURE, &["lpopd_i"]])
            .build(),
    );
    specs
}

fn table10_specs() -> Vec<RegressionSpec> {
    // Columns 2 and 3 are the same regression.
    NestedSpecs::iv::<&str>(
        "lgdp",
        &[],
        &["yearsed"],
        &["miss_presence"],
        Estimator::TwoStepOls(CovarianceType::HC3),
    )
    .map(|s| s.with_fixed_effects("bbb").requiring(&["capital_old"]))
    .blocks(&[&["capital_old"], &[], &GEOGRAPHY, &TEMPERATURE, &["lpopd_i"]])
    .build()
}

/// Re-estimate the last `take` specifications by robust LIML.
fn liml_variant(specs: Vec<RegressionSpec>, take: usize) -> Vec<RegressionSpec> {
    let skip = specs.len().saturating_sub(take);
    specs
        .into_iter()
        .skip(skip)
        .map(|s| RegressionSpec { estimator: Estimator::Liml(CovarianceType::HC0), ..s })
        .collect()
}

fn with_intercept(order: &[&str]) -> Vec<String> {
    order.iter().map(|s| s.to_string()).chain(std::iter::once(INTERCEPT.to_string())).collect()
}

struct Catalogue<'a> {
    data: &'a StudyData,
    style: &'a TableStyle,
    labels: VariableCatalogue,
}

impl Catalogue<'_> {
    fn country_fits(&self, specs: &[RegressionSpec]) -> Result<Vec<Fit>> {
        fit_all(self.data.country(), specs, &COUNTRY_BASE_SAMPLE)
    }

    fn region_fits(&self, specs: &[RegressionSpec]) -> Result<Vec<Fit>> {
        fit_all(self.data.region()?, specs, &REGION_BASE_SAMPLE)
    }

    fn table<M: si_core::FittedModel>(&self, models: &[M], options: &TableOptions) -> Result<Table> {
        comparison_table(models, options, self.style, &self.labels)
    }

    /// First stages of every fit, grouped by endogenous regressor.
    fn first_stages(fits: &[Fit], endog: &[&str]) -> Result<Vec<OlsResult>> {
        let mut out = Vec::with_capacity(fits.len() * endog.len());
        for e in endog {
            for f in fits {
                out.push(f.first_stage(e)?.clone());
            }
        }
        Ok(out)
    }

    fn table1(&self) -> Result<Table> {
        let mut table = Table::new(vec!["Observations".into(), "Mean".into(), "SD".into()]);
        table.title = Some("Table 1: Summary statistics".into());
        let mut samples = vec![("Cross-country sample", prepare_country_data(self.data.country(), &self.labels)?)];
        if self.data.has_region() {
            samples.push(("Cross-region sample", prepare_region_data(self.data.region()?, &self.labels)?));
        } else {
            tracing::info!("region table not supplied; summary covers the country sample only");
        }
        let d = self.style.digits;
        for (group, view) in samples {
            table.push_row(group, RowKind::Group, vec![String::new(); 3])?;
            for row in summary_statistics(&view)? {
                let fmt = |v: f64| if v.is_finite() { format!("{v:.d$}") } else { String::new() };
                table.push_row(
                    row.variable,
                    RowKind::Statistic,
                    vec![row.observations.to_string(), fmt(row.mean), fmt(row.sd)],
                )?;
            }
        }
        Ok(table)
    }

    fn table2(&self) -> Result<Table> {
        let fits = self.country_fits(&table2_specs())?;
        let options = TableOptions::regression(&[
            "tyr05_n", "ruleoflaw", "lat_abst", "africa", "america", "asia", "f_brit", "f_french",
        ])
        .with_title("Table 2: Ordinary least squares (OLS) cross-country regressions")
        .with_dependent_header("Dependent Variable: log GDP per capita")
        .with_note(OLS_NOTE)
        .with_note(ROBUST_NOTE)
        .with_note("Dependent variable: log GDP per capita in 2005");
        self.table(&fits, &options)
    }

    fn table3(&self) -> Result<Table> {
        let fits = self.country_fits(&table3_specs())?;
        let options =
            TableOptions::regression(&["protmiss", "lat_abst", "africa", "america", "f_french", "f_brit"])
                .with_title("Table 3: Falsification exercise, Protestant missionaries, cross-country sample")
                .with_column_group("Dependent variable: Primary school enrollment in 1870", 4)
                .with_column_group("Dependent variable: Primary school enrollment in 1940", 4)
                .with_column_group("Dependent variable: years of schooling in 2005", 4)
                .with_note(OLS_NOTE)
                .with_note(ROBUST_NOTE);
        self.table(&fits, &options)
    }

    /// Panel A (second stages with over-identification row) and Panel B
    /// (first stages) of a two-step table.
    fn two_step_panels(
        &self,
        fits: &[Fit],
        second: TableOptions,
        endog: &[&str],
        first: TableOptions,
    ) -> Result<Vec<Table>> {
        let second = TableOptions { show_overid: true, ..second }.with_note(TWO_STEP_NOTE).with_note(OVERID_NOTE);
        Ok(vec![self.table(fits, &second)?, self.table(&Self::first_stages(fits, endog)?, &first)?])
    }

    fn table4(&self) -> Result<Vec<Table>> {
        let fits = self.country_fits(&table4_specs())?;
        let a = TableOptions {
            show_r2: false,
            show_n: false,
            ..TableOptions::regression(&[
                "tyr05_n", "dummy_dennis", "lat_abst", "africa", "america", "asia", "f_french", "f_brit",
                "lcapped", "lpd1500s",
            ])
        }
        .with_title("Table 4, Panel A: Second-stage regressions")
        .with_dependent_header("Dependent Variable: log GDP per capita in 2005")
        .with_column_group("2SLS", fits.len());
        let b = TableOptions::regression(&[
            "prienr1900", "protmiss", "dummy_dennis", "lat_abst", "africa", "america", "asia", "f_brit",
            "f_french", "lcapped", "lpd1500s",
        ])
        .with_title("Table 4, Panel B: First-stage regressions")
        .with_dependent_header("Dependent Variable: Years of schooling in 2005");
        self.two_step_panels(&fits, a, &["tyr05_n"], b)
    }

    fn table5(&self) -> Result<Vec<Table>> {
        let fits = self.country_fits(&table5_specs())?;
        let a = TableOptions {
            show_r2: false,
            show_n: false,
            ..TableOptions::regression(&[
                "ruleoflaw", "lat_abst", "africa", "america", "asia", "f_french", "f_brit", "dummy_dennis",
                "prienr1900", "protmiss",
            ])
        }
        .with_title("Table 5, Panel A: Second-stage regressions")
        .with_dependent_header("Dependent Variable: log GDP per capita in 2005")
        .with_column_group("2SLS", fits.len());
        let b = TableOptions::regression(&[
            "lcapped", "lpd1500s", "lat_abst", "africa", "america", "asia", "f_brit", "f_french",
            "dummy_dennis", "prienr1900", "protmiss",
        ])
        .with_title("Table 5, Panel B: First-stage regressions")
        .with_dependent_header("Dependent Variable: Rule of law");
        self.two_step_panels(&fits, a, &["ruleoflaw"], b)
    }

    fn table6(&self) -> Result<Vec<Table>> {
        let fits = self.country_fits(&table6_specs())?;
        let a = TableOptions::regression(&[
            "tyr05_n", "ruleoflaw", "dummy_dennis", "lat_abst", "africa", "america", "asia", "f_brit", "f_french",
        ])
        .with_title("Table 6, Panel A: Second-stage regressions")
        .with_dependent_header("Dependent Variable: Log GDP per capita in 2005");
        let b = TableOptions::regression(&[
            "prienr1900", "protmiss", "lcapped", "lpd1500s", "dummy_dennis", "lat_abst", "africa", "america",
            "asia", "f_brit", "f_french",
        ])
        .with_title("Table 6, Panel B: First-stage regressions")
        .with_column_group("Dependent variable: years of schooling", fits.len())
        .with_column_group("Dependent variable: rule of law", fits.len());
        self.two_step_panels(&fits, a, &["tyr05_n", "ruleoflaw"], b)
    }

    fn table7(&self) -> Result<Table> {
        let fits = self.country_fits(&table7_specs())?;
        let mut order = vec![
            "ruleoflaw", "tyr05_n", "dummy_dennis", "lat_abst", "africa", "america", "asia", "f_brit", "f_french",
            "malfal94",
        ];
        order.extend(CLIMATE);
        order.extend(RELIGION);
        let options = TableOptions::iv_comparison(&with_intercept(&order))
            .with_title("Table 7: Robustness checks, LIML estimates")
            .with_dependent_header("Dependent Variable: Log GDP per capita in 2005")
            .with_note("Columns (1) and (2) exclude the neo-Europes and have no intercept");
        self.table(&fits, &options)
    }

    fn table8(&self) -> Result<Table> {
        let fits = self.country_fits(&table8_specs())?;
        let options = TableOptions {
            show_r2: false,
            show_overid: true,
            ..TableOptions::regression(&[
                "tyr05_n", "dummy_dennis", "lat_abst", "africa", "america", "asia", "f_french", "f_brit",
                "lcapped", "lpd1500s",
            ])
        }
        .with_title("Table 8, Effects of years of schooling on institutions, second-stage regression, cross-country sample")
        .with_dependent_header("Dependent Variable: rule of law")
        .with_column_group("2SLS", fits.len())
        .with_note(TWO_STEP_NOTE)
        .with_note(OVERID_NOTE);
        self.table(&fits, &options)
    }

    fn liml(&self, title: &str, specs: Vec<RegressionSpec>, take: usize) -> Result<Table> {
        let specs = liml_variant(specs, take);
        let fits = self.country_fits(&specs)?;
        let dependent = specs.first().map_or("", |s| s.dependent.as_str());
        let mut order: Vec<&str> = Vec::new();
        for s in &specs {
            for v in s.endog.iter().chain(&s.exog) {
                if !order.contains(&v.as_str()) {
                    order.push(v);
                }
            }
        }
        let options = TableOptions::iv_comparison(&with_intercept(&order))
            .with_title(title)
            .with_dependent_header(format!("Dependent Variable: {}", self.labels.label(dependent)));
        self.table(&fits, &options)
    }

    fn table9(&self) -> Result<Table> {
        let fits = self.region_fits(&table9_specs())?;
        let options = TableOptions::regression(&[
            "yearsed", "capital_old", "invdistcoast", "invdis2", "landlocked", "temp_avg", "temp2", "lpopd_i",
        ])
        .with_title("Table 9: Cross-region OLS regressions")
        .with_dependent_header("Dependent Variable: log GDP per capita")
        .with_extra_row("Country fixed effects", vec!["Yes".to_string(); fits.len()]);
        self.table(&fits, &options)
    }

    fn table10(&self) -> Result<Vec<Table>> {
        let fits = self.region_fits(&table10_specs())?;
        let controls = ["capital_old", "invdistcoast", "invdis2", "landlocked", "temp_avg", "temp2", "lpopd_i"];
        let fe = vec!["Yes".to_string(); fits.len()];

        let mut second_order = vec!["yearsed"];
        second_order.extend(controls);
        let a = TableOptions { show_n: false, show_r2: false, ..TableOptions::regression(&second_order) }
            .with_title("IV regressions, cross region")
            .with_dependent_header("Dependent Variable: log GDP per capita")
            .with_extra_row("Country fixed effects", fe.clone());

        let mut first_order = vec!["miss_presence"];
        first_order.extend(controls);
        let b = TableOptions::regression(&first_order)
            .with_title("First-stage regressions")
            .with_dependent_header("Dependent Variable: Years of schooling")
            .with_extra_row("Country fixed effects", fe);
        self.two_step_panels(&fits, a, &["yearsed"], b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_names() {
        for id in ReportId::ALL {
            assert_eq!(id.as_str().parse::<ReportId>().unwrap(), id);
        }
        assert_eq!("TABLE4_LIML".parse::<ReportId>().unwrap(), ReportId::Table4Liml);
        assert!("table11".parse::<ReportId>().is_err());
    }

    #[test]
    fn table2_interleaves_key_variables() {
        let specs = table2_specs();
        assert_eq!(specs.len(), 12);
        assert_eq!(specs[0].exog, vec!["tyr05_n"]);
        assert_eq!(specs[1].exog, vec!["ruleoflaw"]);
        assert_eq!(specs[2].exog, vec!["tyr05_n", "ruleoflaw"]);
        assert_eq!(specs[11].exog.len(), 8);
    }

    #[test]
    fn table3_filters_only_schooling_columns() {
        let specs = table3_specs();
        assert_eq!(specs.len(), 12);
        assert!(specs[..8].iter().all(|s| s.filters.is_empty()));
        assert!(specs[8..].iter().all(|s| s.filters.len() == 2 && s.dependent == "tyr05_n"));
    }

    #[test]
    fn iv_tables_have_two_groups_of_four() {
        let specs = table4_specs();
        assert_eq!(specs.len(), 8);
        assert_eq!(specs[3].exog, vec!["dummy_dennis", "lat_abst", "africa", "america", "asia", "f_french", "f_brit"]);
        assert_eq!(specs[4].exog, vec!["dummy_dennis", "lcapped", "lpd1500s"]);
        assert_eq!(table5_specs()[0].exog, Vec::<String>::new());
        assert_eq!(table6_specs().len(), 4);
        assert_eq!(table6_specs()[0].instruments.len(), 4);
    }

    #[test]
    fn liml_variants_take_last_specs() {
        let specs = liml_variant(table4_specs(), 4);
        assert_eq!(specs.len(), 4);
        assert!(specs[0].exog.contains(&"lcapped".to_string()));
        assert!(specs.iter().all(|s| s.estimator == Estimator::Liml(CovarianceType::HC0)));
    }

    #[test]
    fn table7_layout() {
        let specs = table7_specs();
        assert_eq!(specs.len(), 8);
        assert!(!specs[0].intercept && !specs[1].intercept);
        assert!(specs[2..].iter().all(|s| s.intercept));
        assert!(specs[1].exog.contains(&"f_french".to_string()));
        assert!(specs[3].exog.contains(&"malfal94".to_string()));
        assert_eq!(specs[4].exog.len(), 5 + 9);
    }

    #[test]
    fn region_tables() {
        let t9 = table9_specs();
        assert_eq!(t9.len(), 6);
        assert!(t9[0].require.is_empty());
        assert!(t9[1..].iter().all(|s| s.require == vec!["capital_old"]));
        let t10 = table10_specs();
        assert_eq!(t10.len(), 6);
        assert_eq!(t10[1], t10[2]);
        assert_eq!(t10[5].exog.last().map(String::as_str), Some("lpopd_i"));
    }
}
