use console::Style;
use dfbyf_core::pipeline::config::AnalysisConfig;
use dfbyf_core::pipeline::AnalysisOutput;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

/// Print the resolved run configuration before processing starts.
pub fn print_config_summary(config: &AnalysisConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("df/f Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(13)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("ROI file"),
        s.path.apply_to(config.roi_file.display())
    );
    match config.outfile {
        Some(ref out) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(out.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("next to last input")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Analysis"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frame rate"),
        s.value.apply_to(format!("{} fps", config.frame_rate))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Baseline"),
        s.value
            .apply_to(format!("median of first {} frames", config.analysis.baseline_frames))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(format!(
            "{:.0}% of max",
            config.analysis.threshold_fraction * 100.0
        ))
    );
    if config.analysis.normalize {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Normalize"),
            s.value.apply_to("min-max")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Normalize"),
            s.disabled.apply_to("off")
        );
    }
    println!();
}

/// Print what was produced.
pub fn print_output_summary(output: &AnalysisOutput) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Files"),
        s.value.apply_to(output.file_count())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("ROIs"),
        s.value.apply_to(output.roi_count())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(output.frame_count())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Data"),
        s.path.apply_to(output.data_path.display())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Heatmap"),
        s.path.apply_to(output.plot_path.display())
    );
    println!();
}
