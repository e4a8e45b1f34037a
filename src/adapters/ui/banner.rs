//! Startup banner: app name with a per-character colour gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

const TITLE: &str = "T O N E - R E L A Y";

/// Sky blue (#38bdf8).
const SKY: (u8, u8, u8) = (0x38, 0xbd, 0xf8);
/// Pink (#f472b6).
const PINK: (u8, u8, u8) = (0xf4, 0x72, 0xb6);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the title with a gradient from sky blue to pink, then the version.
pub fn print_welcome() {
    let mut out = stdout();
    let chars: Vec<char> = TITLE.chars().collect();
    let last = chars.len().saturating_sub(1).max(1);

    let _ = out.execute(Print("\r\n  "));
    for (i, ch) in chars.iter().enumerate() {
        let (r, g, b) = lerp_rgb(SKY, PINK, i as f64 / last as f64);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(ch));
    }
    let _ = out.execute(ResetColor);

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: PINK.0,
        g: PINK.1,
        b: PINK.2,
    }));
    let _ = out.execute(Print(format!("\r\n  v{} · one draft, every tone\r\n\r\n", version)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb(SKY, PINK, 0.0), SKY);
        assert_eq!(lerp_rgb(SKY, PINK, 1.0), PINK);
    }
}
