use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use meatstack_rs::config::{ChartConfig, load_config};
use meatstack_rs::models::{CountryRecord, StackMode};
use meatstack_rs::transform::{CountryNames, RowFilter, process_data};
use meatstack_rs::viz::svg::{Start, render_scene};
use meatstack_rs::viz::{OutputKind, page, plot_stacked};
use meatstack_rs::{StackedBarChart, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "meatstack",
    version,
    about = "Reshape meat-consumption statistics and render stacked bar charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the chart to .svg (animated), .html (with toggle), or .png.
    Render(RenderArgs),
    /// Print or save the per-country records.
    Records(RecordsArgs),
    /// Print the stacked intervals for one mode as JSON.
    Layout(LayoutArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Stacked,
    Separated,
    Percentage,
}

impl From<ModeArg> for StackMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Stacked => StackMode::Stacked,
            ModeArg::Separated => StackMode::Separated,
            ModeArg::Percentage => StackMode::Percentage,
        }
    }
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Consumption CSV (LOCATION, SUBJECT, Value, ...)
    #[arg(long)]
    data: PathBuf,
    /// Country code CSV (Country, Alpha-3 code, ...)
    #[arg(long)]
    countries: PathBuf,
    /// JSON chart config; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep only rows with this TIME value.
    #[arg(long)]
    year: Option<String>,
    /// Keep only rows with this MEASURE value (e.g. KG_CAP).
    #[arg(long)]
    measure: Option<String>,
    /// Aggregate codes to drop, separated by comma or semicolon (default WLD,OECD,BRICS).
    #[arg(long)]
    exclude: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output path; format inferred from the extension.
    #[arg(long)]
    out: PathBuf,
    /// Stacking mode (initially selected mode for .html).
    #[arg(long, value_enum, default_value = "stacked")]
    mode: ModeArg,
    /// Draw .svg with plotters instead of the animated scene writer.
    #[arg(long = "static", default_value_t = false)]
    static_svg: bool,
    /// Mode whose geometry the animated SVG starts from.
    #[arg(long, value_enum)]
    from: Option<ModeArg>,
    /// Canvas width (overrides config).
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height (overrides config).
    #[arg(long)]
    height: Option<u32>,
    /// TTF for .png and --static output.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Page title for .html output.
    #[arg(long, default_value = "Meat Consumption")]
    title: String,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RecordsArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Save records to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print per-subject statistics and country totals.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum, default_value = "stacked")]
    mode: ModeArg,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Records(args) => cmd_records(args),
        Command::Layout(args) => cmd_layout(args),
    };
    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}

/// Load config and both CSVs, then build the records.
fn load_records(input: &InputArgs) -> Result<(ChartConfig, Vec<CountryRecord>)> {
    let mut cfg = match &input.config {
        Some(p) => load_config(p)?,
        None => ChartConfig::default(),
    };
    if let Some(ex) = &input.exclude {
        cfg.excluded_codes = parse_list(ex);
    }
    let rows = storage::load_consumption_csv(&input.data)?;
    let codes = storage::load_country_codes_csv(&input.countries)?;
    let names = CountryNames::from_rows(&codes);
    let filter = RowFilter {
        time: input.year.clone(),
        measure: input.measure.clone(),
    };
    let records = process_data(&rows, &names, &cfg.excluded_codes, &filter, &cfg.icon_dir)
        .context("transforming consumption rows")?;
    Ok((cfg, records))
}

fn build_chart(cfg: ChartConfig, records: Vec<CountryRecord>) -> Result<StackedBarChart> {
    let count_label = cfg.count_label.clone();
    let percentage_label = cfg.percentage_label.clone();
    Ok(StackedBarChart::new(records, &count_label, &percentage_label, cfg)?)
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let (mut cfg, records) = load_records(&args.input)?;
    if let Some(w) = args.width {
        cfg.width = w as f64;
    }
    if let Some(h) = args.height {
        cfg.height = h as f64;
    }
    if args.font.is_some() {
        cfg.font_path = args.font.clone();
    }
    let kind = OutputKind::from_path(&args.out, args.static_svg).ok_or_else(|| {
        anyhow::anyhow!("unsupported output {}; use .svg, .html, or .png", args.out.display())
    })?;
    let (width, height) = (cfg.width.round() as u32, cfg.height.round() as u32);
    let mut chart = build_chart(cfg, records)?;
    let mode = StackMode::from(args.mode);

    match kind {
        OutputKind::AnimatedSvg => {
            let previous = args.from.map(|m| chart.scene(&chart.layout_for(m.into())));
            let state = chart.on_stack_change(mode).clone();
            let scene = chart.scene(&state);
            let start = match &previous {
                Some(prev) => Start::Previous(prev),
                None => Start::Baseline,
            };
            std::fs::write(&args.out, render_scene(&scene, start))
                .with_context(|| format!("writing {}", args.out.display()))?;
        }
        OutputKind::Html => {
            let html = page::render_page(&chart, mode, &args.title);
            std::fs::write(&args.out, html)
                .with_context(|| format!("writing {}", args.out.display()))?;
        }
        OutputKind::Png | OutputKind::StaticSvg => {
            let state = chart.on_stack_change(mode).clone();
            plot_stacked(&chart, &state, &args.out, width, height)?;
        }
    }
    eprintln!("Wrote {} chart to {}", mode, args.out.display());
    Ok(())
}

fn cmd_records(args: RecordsArgs) -> Result<()> {
    let (_cfg, records) = load_records(&args.input)?;

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_records_csv(&records, path)?,
            "json" => storage::save_records_json(&records, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} records to {}", records.len(), path.display());
    } else if !args.stats {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    if args.stats {
        for s in stats::subject_summary(&records) {
            println!(
                "{}  count={}  min={} max={} mean={} median={}",
                s.subject,
                s.count,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
        for t in stats::country_totals(&records) {
            println!("{} • {}  total={}", t.code, t.name, fmt_opt(Some(t.total)));
        }
    }
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> Result<()> {
    let (cfg, records) = load_records(&args.input)?;
    let mut chart = build_chart(cfg, records)?;
    let state = chart.on_stack_change(args.mode.into()).clone();
    let out = serde_json::json!({
        "mode": state.mode,
        "y_label": state.y_label,
        "y_domain": [state.y.domain.0, state.y.domain.1],
        "countries": chart.records().iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
        "series": state.series,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
