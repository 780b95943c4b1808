use std::path::Path;

use console::Style;
use prism_core::buffer::PixelBuffer;
use prism_core::config::DecompositionConfig;
use prism_core::decompose::{DecomposeMode, SplitLayout};
use prism_core::viewport::ViewportController;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_split_summary(
    input: &Path,
    image: &PixelBuffer,
    mode: DecomposeMode,
    config: &DecompositionConfig,
) {
    let s = Styles::new();
    print_title(&s, "Channel Split");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value
            .apply_to(format!("{}x{} {}", image.width(), image.height(), image.format()))
    );
    println!("  {:<14}{}", s.label.apply_to("Mode"), s.method.apply_to(mode));

    if image.is_grayscale() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Layout"),
            s.disabled.apply_to("unchanged")
        );
    } else {
        let layout = SplitLayout::for_size(image.width(), image.height());
        let (w, h) = layout.output_size(image.width(), image.height());
        println!(
            "  {:<14}{}",
            s.label.apply_to("Layout"),
            s.value.apply_to(format!("{layout:?} ({w}x{h})"))
        );
    }

    let execution = if config.is_large(image.pixel_count()) {
        s.method.apply_to("worker thread")
    } else {
        s.disabled.apply_to("inline")
    };
    println!("  {:<14}{}", s.label.apply_to("Execution"), execution);
    println!();
}

pub fn print_render_summary(viewport: &ViewportController) {
    let s = Styles::new();
    print_title(&s, "Viewport");

    let surface = viewport.surface_size();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Surface"),
        s.value
            .apply_to(format!("{}x{}", surface.width, surface.height))
    );

    let t = viewport.transform();
    let scale = if viewport.is_best_fit() {
        format!("{:.3} (best fit)", t.sx)
    } else {
        format!("{:.3}", t.sx)
    };
    println!("  {:<14}{}", s.label.apply_to("Scale"), s.value.apply_to(scale));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Filter"),
        s.method.apply_to(if viewport.is_smooth() {
            "bilinear"
        } else {
            "nearest"
        })
    );

    match viewport.measurement_line() {
        Some(line) => println!(
            "  {:<14}{}",
            s.label.apply_to("Line"),
            s.value.apply_to(format!(
                "({}, {}) -> ({}, {}), {:.2} px",
                line.x0,
                line.y0,
                line.x1,
                line.y1,
                line.length()
            ))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Line"),
            s.disabled.apply_to("none")
        ),
    }
    println!();
}
