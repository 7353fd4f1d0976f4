//! Figure rendering via the external gnuplot/latex toolchain.
//!
//! The plot script names its output with an `epsfile 'name.tex'` line;
//! rendering wraps the gnuplot-emitted TeX in a one-figure document,
//! drives latex → dvips → ps2eps → ps2pdf → convert, and keeps only the
//! cropped PDF. Intermediates are removed however the run ends.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

/// Stem for the wrapper document and its latex/dvips by-products.
const WRAPPER_STEM: &str = "aux1459";

#[derive(Debug)]
pub enum FigureError {
    /// The script carries no `epsfile '...'` marker line.
    NoFigureReference(PathBuf),
    Tool { tool: &'static str, detail: String },
    Io(io::Error),
}

impl fmt::Display for FigureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FigureError::NoFigureReference(script) => {
                write!(f, "{} names no epsfile output", script.display())
            }
            FigureError::Tool { tool, detail } => write!(f, "{tool}: {detail}"),
            FigureError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl Error for FigureError {}

impl From<io::Error> for FigureError {
    fn from(e: io::Error) -> Self {
        FigureError::Io(e)
    }
}

/// Stem of the TeX figure named by the script's first `epsfile` line,
/// `epsfile 'name.tex'` yielding `name`.
pub fn embedded_figure_stem(script: &str) -> Option<String> {
    for line in script.lines() {
        let Some(rest) = line.strip_prefix("epsfile") else {
            continue;
        };
        let name = rest.trim().strip_prefix('\'')?.strip_suffix('\'')?;
        return Some(name.strip_suffix(".tex")?.to_string());
    }
    None
}

/// Single-figure revtex document that inputs the gnuplot-emitted TeX.
pub fn latex_wrapper(stem: &str) -> String {
    format!(
        r#"
\documentclass[prl,10pt]{{revtex4}}
\usepackage[dvips]{{graphicx}}
\usepackage[latin1]{{inputenc}}
\usepackage{{amsmath}}
\usepackage{{xcolor}}
\begin{{document}}
\thispagestyle{{empty}}

\begin{{figure}}
\input{{"{stem}"}}
\end{{figure}}

\end{{document}}
"#
    )
}

/// Removes whatever tracked artifacts still exist when dropped.
struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for path in &self.paths {
            if path.exists() {
                let _ = fs::remove_file(path);
            }
        }
    }
}

fn run_tool(tool: &'static str, cmd: &mut Command) -> Result<(), FigureError> {
    debug!(tool, "running");
    let status = cmd.status().map_err(|e| FigureError::Tool {
        tool,
        detail: e.to_string(),
    })?;
    if !status.success() {
        return Err(FigureError::Tool {
            tool,
            detail: format!("exited with {status}"),
        });
    }
    Ok(())
}

/// Drive the full toolchain over `script`, leaving only `<stem>.pdf` in
/// the working directory. Each tool call blocks; the first failure stops
/// the chain, and tracked intermediates are removed either way.
pub fn render(script: &Path) -> Result<PathBuf, FigureError> {
    let text = fs::read_to_string(script)?;
    let stem = embedded_figure_stem(&text)
        .ok_or_else(|| FigureError::NoFigureReference(script.to_path_buf()))?;
    info!(script = %script.display(), figure = %stem, "rendering");

    let wrapper_tex = format!("{WRAPPER_STEM}.tex");
    let wrapper_dvi = format!("{WRAPPER_STEM}.dvi");
    let wrapper_ps = format!("{WRAPPER_STEM}.ps");
    let wrapper_eps = format!("{WRAPPER_STEM}.eps");
    let figure_tex = format!("{stem}.tex");
    let figure_eps = format!("{stem}.eps");
    let figure_pdf = format!("{stem}.pdf");
    let figure_bmp = format!("{stem}.bmp");

    let mut temps = TempArtifacts { paths: Vec::new() };
    for ext in ["tex", "dvi", "ps", "log", "aux", "eps"] {
        temps.track(format!("{WRAPPER_STEM}.{ext}"));
    }
    temps.track(&figure_tex);
    temps.track(&figure_eps);
    temps.track(&figure_bmp);

    run_tool("gnuplot", Command::new("gnuplot").arg(script))?;
    fs::write(&wrapper_tex, latex_wrapper(&stem))?;
    run_tool("latex", Command::new("latex").arg(&wrapper_tex))?;
    run_tool("dvips", Command::new("dvips").arg(&wrapper_dvi))?;
    run_tool("ps2eps", Command::new("ps2eps").arg(&wrapper_ps))?;
    fs::rename(&wrapper_eps, &figure_eps)?;
    run_tool(
        "ps2pdf",
        Command::new("ps2pdf").arg("-dEPSCrop").arg(&figure_eps),
    )?;
    run_tool(
        "convert",
        Command::new("convert")
            .args(["-density", "300", "-background", "white", "-flatten"])
            .arg(&figure_pdf)
            .arg(&figure_bmp),
    )?;
    Ok(PathBuf::from(figure_pdf))
}
