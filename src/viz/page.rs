//! Self-contained HTML page: the stacking toggle plus one chart per mode.
//!
//! Which chart is visible is pure CSS (`:has(:checked)`). The initially
//! selected chart grows out of the axis on load. Every chart also carries
//! idle transitions from the other two modes, and a short script starts the
//! matching set when the toggle changes, so bars move from their previous
//! layout.

use std::fmt::Write;

use super::svg::{Start, render_switchable};
use super::util::xml_escape;
use crate::chart::StackedBarChart;
use crate::models::StackMode;
use crate::toggle::{RadioToggleGroup, stack_options};

pub const TOGGLE_TITLE: &str = "Choose stacking";
pub const TOGGLE_NAME: &str = "stack-option";

pub fn render_page(chart: &StackedBarChart, selected: StackMode, title: &str) -> String {
    let toggle = RadioToggleGroup::new(TOGGLE_TITLE, TOGGLE_NAME, stack_options(), selected, |_: &StackMode| {});

    let mut css = String::from(
        "body { font-family: sans-serif; color: #222; margin: 2rem; }\n\
         .btn-check { position: absolute; opacity: 0; }\n\
         .btn { border: 1px solid #888; padding: 0.25rem 0.75rem; cursor: pointer; }\n\
         .btn-check:checked + .btn { background: #222; color: #fff; }\n\
         #chart-container .chart { display: none; }\n",
    );
    for (i, opt) in toggle.options().iter().enumerate() {
        let _ = writeln!(
            css,
            "body:has(#{}:checked) #chart-container .chart-{} {{ display: block; }}",
            toggle.input_id(i),
            opt.value
        );
    }

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", xml_escape(title));
    let _ = writeln!(out, "<style>\n{css}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>{}</h1>", xml_escape(title));
    out.push_str("<div id=\"stack-toggle\">\n");
    out.push_str(&toggle.render_html());
    out.push_str("</div>\n<div id=\"chart-container\">\n");
    let scenes: Vec<_> = StackMode::ALL
        .iter()
        .map(|m| chart.scene(&chart.layout_for(*m)))
        .collect();
    let sources: Vec<_> = scenes.iter().collect();
    for scene in &scenes {
        let start = if scene.mode == selected {
            Start::Baseline
        } else {
            Start::Final
        };
        let _ = writeln!(out, "<div class=\"chart chart-{}\">", scene.mode);
        out.push_str(&render_switchable(scene, start, &sources));
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
    out.push_str(&switch_script(selected));
    out.push_str("</body>\n</html>\n");
    out
}

/// Starts the `from-{previous}` transitions of the newly shown chart.
fn switch_script(selected: StackMode) -> String {
    format!(
        r##"<script>
(function () {{
  var current = "{selected}";
  document.querySelectorAll('#stack-toggle input[name="{TOGGLE_NAME}"]').forEach(function (input) {{
    input.addEventListener("change", function () {{
      var previous = current;
      current = input.value;
      var svg = document.querySelector("#chart-container .chart-" + current + " svg");
      if (!svg || previous === current) return;
      svg.querySelectorAll(".from-" + previous).forEach(function (el) {{
        if (el.tagName === "set") {{
          el.beginElement();
        }} else {{
          el.beginElementAt(parseFloat(el.getAttribute("data-delay")) || 0);
        }}
      }});
    }});
  }});
}})();
</script>
"##
    )
}
