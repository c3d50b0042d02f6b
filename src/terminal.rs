//! `show`: print a file shaded by line age.
//!
//! Each attributed line is printed in a 24-bit gray proportional to its
//! opacity; unattributed lines (and whole files git can't blame) print plain.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use crate::git::GitRunner;
use crate::heatmap::{now, Heatmap};
use crate::models::{DocumentRef, OpacityBatch};

pub async fn show<R: GitRunner>(heatmap: &Heatmap<R>, path: &Path, json: bool) -> anyhow::Result<()> {
    let document = DocumentRef {
        path: path.to_path_buf(),
        untitled: false,
    };
    let batches = heatmap.render(&document, now()).await;

    if json {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &batches)?;
        writeln!(out)?;
    } else {
        let content = tokio::fs::read_to_string(path).await?;
        write_shaded(&mut io::stdout().lock(), &content, &batches)?;
    }
    Ok(())
}

/// Foreground gray for `opacity`: 0.0 is black, 1.0 white.
pub fn gray_level(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn write_shaded(out: &mut impl Write, content: &str, batches: &[OpacityBatch]) -> io::Result<()> {
    let by_line: HashMap<u32, f64> = batches
        .iter()
        .flat_map(|batch| batch.ranges.iter().map(move |range| (range.start_line, batch.opacity)))
        .collect();

    for (index, text) in content.lines().enumerate() {
        let opacity = u32::try_from(index).ok().and_then(|line| by_line.get(&line));
        match opacity {
            Some(&opacity) => {
                let level = gray_level(opacity);
                writeln!(out, "{}", text.truecolor(level, level, level))?;
            }
            None => writeln!(out, "{text}")?,
        }
    }
    Ok(())
}
