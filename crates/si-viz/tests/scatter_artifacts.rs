use approx::assert_abs_diff_eq;
use si_core::CovarianceType;
use si_inference::{Design, ols_fit};
use si_viz::scatter::{FIGURE_SCHEMA, SCATTER_FIT_SCHEMA};
use si_viz::{FigureArtifact, PanelText, figure_artifact, scatter_fit_artifact};

fn five_points() -> (Vec<f64>, Vec<f64>, Vec<String>) {
    let x = vec![3.0, 1.0, 4.0, 1.5, 5.0];
    let y = vec![7.2, 2.9, 9.1, 4.2, 10.8];
    let labels = ["AAA", "BBB", "CCC", "DDD", "EEE"].iter().map(|s| s.to_string()).collect();
    (x, y, labels)
}

const TEXT: PanelText<'static> =
    PanelText { title: "Panel", x_label: "Years of schooling", y_label: "Log GDP per capita" };

#[test]
fn labels_follow_row_order() {
    let (x, y, labels) = five_points();
    let design = Design::from_columns(5, vec![("tyr05_n".into(), x.clone())]).unwrap().with_intercept();
    let fit = ols_fit(&y, &design, "logpgdp05", CovarianceType::HC3).unwrap();
    let panel = scatter_fit_artifact(TEXT, &x, &y, &labels, &fit, "tyr05_n").unwrap();

    assert_eq!(panel.schema_version, SCATTER_FIT_SCHEMA);
    assert_eq!(panel.points.len(), 5);
    for (i, p) in panel.points.iter().enumerate() {
        assert_eq!(p.label, labels[i]);
        assert_eq!(p.x, x[i]);
        assert_eq!(p.y, y[i]);
        assert_abs_diff_eq!(p.fitted, panel.fit.intercept + panel.fit.slope * p.x, epsilon = 1e-9);
    }
    // Line is sorted by x for drawing.
    assert!(panel.fit.x.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(panel.fit.x.first().copied(), Some(1.0));
    assert_eq!(panel.fit.x.last().copied(), Some(5.0));
}

#[test]
fn figure_json_roundtrip() {
    let (x, y, labels) = five_points();
    let design = Design::from_columns(5, vec![("x".into(), x.clone())]).unwrap().with_intercept();
    let fit = ols_fit(&y, &design, "y", CovarianceType::HC3).unwrap();
    let panel = scatter_fit_artifact(TEXT, &x, &y, &labels, &fit, "x").unwrap();
    let fig = figure_artifact("figure1", vec![panel.clone(), panel]).unwrap();

    let json = serde_json::to_string(&fig).unwrap();
    let back: FigureArtifact = serde_json::from_str(&json).unwrap();
    assert_eq!(back.schema_version, FIGURE_SCHEMA);
    assert_eq!(back.panels.len(), 2);
    assert_eq!(back.panels[1].points[3].label, "DDD");
}

#[test]
fn mismatched_lengths_rejected() {
    let (x, y, mut labels) = five_points();
    let design = Design::from_columns(5, vec![("x".into(), x.clone())]).unwrap().with_intercept();
    let fit = ols_fit(&y, &design, "y", CovarianceType::HC3).unwrap();
    labels.pop();
    assert!(scatter_fit_artifact(TEXT, &x, &y, &labels, &fit, "x").is_err());
    labels.push("EEE".into());
    assert!(scatter_fit_artifact(TEXT, &x, &y, &labels, &fit, "missing").is_err());
    assert!(figure_artifact("empty", vec![]).is_err());
}
