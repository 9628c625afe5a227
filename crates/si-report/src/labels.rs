//! Human-readable variable labels.
//!
//! One catalogue serves every table, summary view and figure, so a variable
//! carries the same label wherever it appears.

use si_inference::INTERCEPT;

const STANDARD: &[(&str, &str)] = &[
    // Country sample
    ("code", "Country code"),
    ("logpgdp05", "Log GDP per capita"),
    ("tyr05_n", "Years of schooling"),
    ("ruleoflaw", "Rule of law"),
    ("prienr1870", "Primary school enrollment 1870"),
    ("prienr1900", "Primary school enrollment 1900"),
    ("prienr1940", "Primary school enrollment 1940"),
    ("protmiss", "Protestant missionaries in the early twentieth century"),
    ("Yrsmis60", "Years of Protestant missions before 1960"),
    ("dummy_dennis", "Dummy for different source of Protestant missions"),
    ("lcapped", "Log capped potential settler mortality"),
    ("lpd1500s", "Log population density 1500"),
    ("lat_abst", "Latitude"),
    ("africa", "Africa"),
    ("america", "America"),
    ("asia", "Asia"),
    ("f_brit", "British colony"),
    ("f_french", "French colony"),
    ("baseco", "Base sample"),
    ("malfal94", "Falciparum malaria index 1994"),
    ("neoeuropes", "Neo-Europes"),
    ("cath1900", "Catholic affiliation"),
    ("prot1900", "Protestant affiliation"),
    ("musl1900", "Muslim affiliation"),
    // Region sample
    ("bbb", "Country"),
    ("lgdp", "Log GDP per capita"),
    ("yearsed", "Years of schooling"),
    ("capital_old", "Capital city"),
    ("invdistcoast", "Inverse distance to coast"),
    ("invdis2", "Squared inverse distance to coast"),
    ("landlocked", "Landlocked region"),
    ("temp_avg", "Average yearly temperature (Celsius)"),
    ("temp2", "Squared average yearly temperature (Celsius)"),
    ("lpopd_i", "Log population density before colonization"),
    ("miss_presence", "Presence of Protestant missionaries in early twentieth century"),
    (INTERCEPT, "Intercept"),
];

/// Mapping from short variable codes to display labels.
#[derive(Debug, Clone)]
pub struct VariableCatalogue {
    entries: Vec<(String, String)>,
}

impl Default for VariableCatalogue {
    fn default() -> Self {
        Self::standard()
    }
}

impl VariableCatalogue {
    /// The catalogue used by every report.
    pub fn standard() -> Self {
        Self { entries: STANDARD.iter().map(|(c, l)| (c.to_string(), l.to_string())).collect() }
    }

    /// Display label of `code`; unknown codes are shown as-is.
    pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
        self.entries.iter().find(|(c, _)| c == code).map_or(code, |(_, l)| l.as_str())
    }

    /// `(code, label)` pairs for the given codes, suitable for [`si_core::Frame::rename`].
    pub fn rename_pairs<'a>(&'a self, codes: &[&'a str]) -> Vec<(&'a str, &'a str)> {
        codes.iter().map(|c| (*c, self.label(c))).collect()
    }

    /// All entries.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}
