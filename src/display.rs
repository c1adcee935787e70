use super::chart::Chart;
use super::render;
use super::theme::Theme;
use super::PlotError;
use chrono::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Something that can put a chart in front of the user.
pub trait ChartViewer {
    fn show(&mut self, chart: &Chart, theme: &Theme) -> Result<(), PlotError>;
}

/// Renders the chart to a temporary svg file and opens it with the desktop's default viewer.
///
/// The opener usually hands the file over to the viewer and returns, so `show`
/// then blocks until the user presses enter; the file is removed afterwards.
#[derive(Debug, Clone)]
pub struct SystemViewer {
    dir: Option<PathBuf>,
    wait_for_close: bool,
}

impl Default for SystemViewer {
    fn default() -> Self {
        SystemViewer::new()
    }
}

impl SystemViewer {
    /// images go to the system temp dir
    pub fn new() -> SystemViewer {
        SystemViewer {
            dir: None,
            wait_for_close: true,
        }
    }

    pub fn in_dir(dir: PathBuf) -> SystemViewer {
        SystemViewer {
            dir: Some(dir),
            wait_for_close: true,
        }
    }

    /// return as soon as the opener exits instead of waiting for enter
    pub fn no_wait(mut self) -> SystemViewer {
        self.wait_for_close = false;
        self
    }

    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// <title>_<timestamp>_, the title reduced to characters safe in file names
    pub fn image_prefix(title: &str, stamp: DateTime<Local>) -> String {
        let mut name: String = title
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if name.is_empty() {
            name.push_str("chart");
        }
        format!("{}_{}_", name, stamp.format(STAMP_FORMAT))
    }
}

impl ChartViewer for SystemViewer {
    fn show(&mut self, chart: &Chart, theme: &Theme) -> Result<(), PlotError> {
        if !display_available() {
            return Err(PlotError::DisplayUnavailable(
                "neither DISPLAY nor WAYLAND_DISPLAY is set".to_string(),
            ));
        }
        let (program, args) = opener();
        let program_path = find_program(program).ok_or_else(|| {
            PlotError::DisplayUnavailable(format!("{} not found in PATH", program))
        })?;

        let svg = render::to_svg_string(chart, theme)?;
        let prefix = SystemViewer::image_prefix(&chart.title, Local::now());
        // removed from disk when dropped
        let mut image = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".svg")
            .tempfile_in(self.dir())?;
        image.write_all(svg.as_bytes())?;
        image.flush()?;

        log::info!("opening {} with {}", image.path().display(), program);
        let status = Command::new(&program_path)
            .args(args)
            .arg(image.path())
            .status()
            .map_err(|e| {
                PlotError::DisplayUnavailable(format!("could not run {}: {}", program, e))
            })?;
        if !status.success() {
            return Err(PlotError::DisplayUnavailable(format!(
                "{} exited with {}",
                program, status
            )));
        }
        if self.wait_for_close {
            eprintln!("press enter once the chart is closed");
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
        }
        Ok(())
    }
}

/// first match of program on PATH, or program itself when it is a path
fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return if candidate.is_file() {
            Some(candidate.to_path_buf())
        } else {
            None
        };
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(executable_name(program)))
        .find(|p| p.is_file())
}

#[cfg(target_os = "windows")]
fn executable_name(program: &str) -> String {
    format!("{}.exe", program)
}

#[cfg(not(target_os = "windows"))]
fn executable_name(program: &str) -> String {
    program.to_string()
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn display_available() -> bool {
    true
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn display_available() -> bool {
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

#[cfg(target_os = "macos")]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("open", &[])
}

#[cfg(target_os = "windows")]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("cmd", &["/C", "start", ""])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("xdg-open", &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn image_prefix_is_sanitized_and_stamped() {
        assert_eq!(
            SystemViewer::image_prefix("CSR w/o MKL: ELLPACK", stamp()),
            "CSR_w_o_MKL__ELLPACK_20210304-050607_"
        );
    }

    #[test]
    fn blank_title_falls_back() {
        assert_eq!(
            SystemViewer::image_prefix("  ", stamp()),
            "chart_20210304-050607_"
        );
    }

    #[test]
    fn default_dir_is_temp_dir() {
        assert_eq!(SystemViewer::new().dir(), std::env::temp_dir());
        assert_eq!(
            SystemViewer::in_dir(PathBuf::from("out")).dir(),
            PathBuf::from("out")
        );
    }

    #[test]
    fn missing_program_is_not_found() {
        assert_eq!(find_program("./surely/not/an/opener"), None);
    }

    // the only test in this binary touching DISPLAY, WAYLAND_DISPLAY and PATH
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    #[test]
    fn show_fails_before_writing_when_headless_or_without_opener() {
        use std::env;

        let dir = tempfile::tempdir().unwrap();
        let chart = Chart {
            title: "t".to_string(),
            x_label: "Density".to_string(),
            y_label: "CSR w/o MKL".to_string(),
            hue_label: "Vertices".to_string(),
            series: Vec::new(),
        };
        let saved: Vec<(&str, Option<std::ffi::OsString>)> =
            ["DISPLAY", "WAYLAND_DISPLAY", "PATH"]
                .iter()
                .map(|k| (*k, env::var_os(k)))
                .collect();

        env::remove_var("DISPLAY");
        env::remove_var("WAYLAND_DISPLAY");
        let headless = SystemViewer::in_dir(dir.path().to_path_buf())
            .no_wait()
            .show(&chart, &Theme::default());

        env::set_var("DISPLAY", ":99");
        env::set_var("PATH", "");
        let no_opener = SystemViewer::in_dir(dir.path().to_path_buf())
            .no_wait()
            .show(&chart, &Theme::default());

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        assert!(matches!(headless, Err(PlotError::DisplayUnavailable(_))));
        assert!(matches!(
            no_opener,
            Err(PlotError::DisplayUnavailable(msg)) if msg.contains("xdg-open")
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
