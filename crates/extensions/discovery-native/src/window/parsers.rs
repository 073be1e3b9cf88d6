//! Output parsers for the window query commands.

use sightline_protocols::WindowBounds;

/// `xprop -id <id> WM_CLASS` → the class part (second string).
///
/// `WM_CLASS(STRING) = "navigator", "Firefox"` → `Firefox`.
pub fn parse_xprop_class(output: &str) -> Option<String> {
    let (_, values) = output.split_once('=')?;
    let parts: Vec<&str> = values
        .split(',')
        .map(|p| p.trim().trim_matches('"'))
        .filter(|p| !p.is_empty())
        .collect();
    parts.get(1).or(parts.first()).map(|s| s.to_string())
}

/// `xdotool getwindowgeometry --shell <id>` → bounds.
pub fn parse_xdotool_geometry(output: &str) -> Option<WindowBounds> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;
    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "X" => x = value.parse().ok(),
            "Y" => y = value.parse().ok(),
            "WIDTH" => width = value.parse().ok(),
            "HEIGHT" => height = value.parse().ok(),
            _ => {}
        }
    }
    Some(WindowBounds {
        x: x?,
        y: y?,
        width: width?,
        height: height?,
    })
}

/// Front-window report from the System Events script, one field per line:
/// application name, pid, window title, `x,y,width,height`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontWindow {
    pub app_name: String,
    pub pid: Option<u32>,
    pub title: String,
    pub bounds: Option<WindowBounds>,
}

pub fn parse_front_window(output: &str) -> Option<FrontWindow> {
    let mut lines = output.lines().map(str::trim);
    let app_name = lines.next().filter(|l| !l.is_empty())?.to_string();
    let pid = lines.next().and_then(|l| l.parse().ok());
    let title = lines.next().unwrap_or_default().to_string();
    let bounds = lines.next().and_then(parse_bounds_csv);
    Some(FrontWindow {
        app_name,
        pid,
        title,
        bounds,
    })
}

fn parse_bounds_csv(line: &str) -> Option<WindowBounds> {
    let values: Vec<i64> = line
        .split(',')
        .map(|v| v.trim().parse::<f64>().map(|f| f as i64))
        .collect::<Result<_, _>>()
        .ok()?;
    let [x, y, width, height] = values.as_slice() else {
        return None;
    };
    if *width <= 0 || *height <= 0 {
        return None;
    }
    Some(WindowBounds {
        x: *x as i32,
        y: *y as i32,
        width: *width as u32,
        height: *height as u32,
    })
}
