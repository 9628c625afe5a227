use si_viz::{FigureArtifact, FigureMeta, FitLine, ScatterFitArtifact, ScatterPoint};
use si_viz_render::config::{VizConfig, resolve_config};
use si_viz_render::{RenderError, render_svg, render_to_bytes, render_to_file};

fn panel(title: &str) -> ScatterFitArtifact {
    let data = [(2.0, 7.1, "AAA"), (4.0, 7.9, "BBB"), (6.0, 8.6, "CCC"), (8.0, 9.4, "HKG"), (10.0, 10.1, "EEE")];
    let (intercept, slope) = (6.4, 0.37);
    ScatterFitArtifact {
        schema_version: si_viz::SCATTER_FIT_SCHEMA.to_string(),
        title: title.to_string(),
        x_label: "Years of schooling".to_string(),
        y_label: "Log GDP per capita".to_string(),
        points: data
            .iter()
            .map(|&(x, y, label)| ScatterPoint { x, y, label: label.to_string(), fitted: intercept + slope * x })
            .collect(),
        fit: FitLine {
            intercept,
            slope,
            x: data.iter().map(|d| d.0).collect(),
            y: data.iter().map(|d| intercept + slope * d.0).collect(),
        },
        r_squared: 0.99,
    }
}

fn figure() -> FigureArtifact {
    FigureArtifact {
        schema_version: si_viz::FIGURE_SCHEMA.to_string(),
        meta: FigureMeta { tool: "schoolinst".into(), tool_version: "0.1.0".into(), created_unix_ms: 0 },
        id: "figure1".into(),
        panels: vec![panel("Panel A"), panel("Panel B"), panel("Panel C")],
    }
}

#[test]
fn figure_has_three_panels_with_annotations() {
    let json = serde_json::to_string(&figure()).unwrap();
    let svg = render_svg(&json, "figure", &VizConfig::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    for title in ["Panel A", "Panel B", "Panel C"] {
        assert!(svg.contains(title), "{title}");
    }
    assert_eq!(svg.matches("<circle").count(), 15);
    assert_eq!(svg.matches(r#"class="point-label""#).count(), 15);
    assert!(svg.contains(">HKG</text>"));
    assert_eq!(svg.matches("<polyline").count(), 3);
    assert!(svg.contains(r##"stroke="#ff0000" stroke-width="1.20" stroke-dasharray="2 2""##));
    assert!(svg.contains("Years of schooling"));
    assert!(svg.contains(r#"transform="rotate(-90.0"#));
}

#[test]
fn single_panel_respects_config() {
    let json = serde_json::to_string(&panel("Only panel")).unwrap();
    let config = resolve_config(Some("scatter:\n  annotate: false\n  fit_line_dash: solid\nfigure:\n  panel_width: 300\n")).unwrap();
    let svg = render_svg(&json, "scatter_fit", &config).unwrap();
    assert!(svg.contains(r#"width="300""#));
    assert!(!svg.contains("point-label"));
    assert!(!svg.contains("stroke-dasharray=\"2 2\""));
    assert_eq!(svg.matches("<circle").count(), 5);
}

#[test]
fn errors_are_typed() {
    let json = serde_json::to_string(&figure()).unwrap();
    let config = VizConfig::default();
    assert!(matches!(render_svg(&json, "histogram", &config), Err(RenderError::UnknownKind(_))));
    assert!(matches!(render_svg("{not json", "figure", &config), Err(RenderError::Deserialize(_))));
    assert!(matches!(render_to_bytes(&json, "figure", "png", &config), Err(RenderError::UnknownKind(_))));

    let mut empty = figure();
    empty.panels.clear();
    let json = serde_json::to_string(&empty).unwrap();
    assert!(matches!(render_svg(&json, "figure", &config), Err(RenderError::Layout(_))));
}

#[test]
fn writes_svg_file() {
    let json = serde_json::to_string(&figure()).unwrap();
    let path = std::env::temp_dir().join(format!("si_viz_render_{}.svg", std::process::id()));
    render_to_file(&json, "figure", &path, &VizConfig::default()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(written.contains("</svg>"));
}
