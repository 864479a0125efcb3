use launch_core::{ShellView, Surface};

/// Renders shell surface updates as console lines.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl ConsoleView {
    fn line(surface: Surface, change: &str) -> String {
        format!("[{}] {change}", surface.as_str())
    }
}

impl ShellView for ConsoleView {
    fn set_text(&self, surface: Surface, text: &str) {
        println!("{}", Self::line(surface, text));
    }

    fn set_shown(&self, surface: Surface, shown: bool) {
        let change = if shown { "shown" } else { "hidden" };
        println!("{}", Self::line(surface, change));
    }

    fn set_opacity(&self, surface: Surface, opacity: f32) {
        println!("{}", Self::line(surface, &format!("opacity {opacity}")));
    }
}
