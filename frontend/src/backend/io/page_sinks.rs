//! Page sinks for exported reports.
//!
//! `TextPageSink` writes one text file with a form feed between pages.
//! `SvgPageSink` draws each page onto an A4-sized SVG with plotters.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use plotters::prelude::*;

use crate::backend::domain::export_service::{Page, PageSink};

const PAGE_BREAK: &str = "\x0C";

/// A4 at 96 dpi
const A4_SIZE: (u32, u32) = (794, 1123);
/// 10mm at 96 dpi
const PAGE_MARGIN: i32 = 38;
const LINE_HEIGHT: i32 = 24;
const FONT_SIZE: u32 = 14;

pub struct TextPageSink {
    output_dir: PathBuf,
}

impl TextPageSink {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl PageSink for TextPageSink {
    fn write_pages(&mut self, file_stem: &str, pages: &[Page]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create export directory {:?}", self.output_dir))?;

        let content = pages
            .iter()
            .map(|page| page.lines.join("\n"))
            .collect::<Vec<_>>()
            .join(&format!("\n{}", PAGE_BREAK));

        let path = self.output_dir.join(format!("{}.txt", file_stem));
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        debug!("📄 EXPORT: Wrote {} pages to {:?}", pages.len(), path);
        Ok(vec![path])
    }
}

pub struct SvgPageSink {
    output_dir: PathBuf,
}

impl SvgPageSink {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn page_path(&self, file_stem: &str, number: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_page_{}.svg", file_stem, number))
    }

    fn draw_page(path: &Path, page: &Page) -> Result<()> {
        let root = SVGBackend::new(path, A4_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let style = TextStyle::from(("sans-serif", FONT_SIZE).into_font()).color(&BLACK);
        for (index, line) in page.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = PAGE_MARGIN + index as i32 * LINE_HEIGHT;
            root.draw_text(line, &style, (PAGE_MARGIN, y))?;
        }

        let footer = format!("{}", page.number);
        root.draw_text(
            &footer,
            &style,
            (A4_SIZE.0 as i32 / 2, A4_SIZE.1 as i32 - PAGE_MARGIN),
        )?;
        root.present()?;
        Ok(())
    }
}

impl PageSink for SvgPageSink {
    fn write_pages(&mut self, file_stem: &str, pages: &[Page]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create export directory {:?}", self.output_dir))?;

        let mut files = Vec::with_capacity(pages.len());
        for page in pages {
            let path = self.page_path(file_stem, page.number);
            Self::draw_page(&path, page)
                .with_context(|| format!("Failed to draw page {} into {:?}", page.number, path))?;
            files.push(path);
        }
        debug!("📄 EXPORT: Wrote {} SVG pages for {}", files.len(), file_stem);
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pages() -> Vec<Page> {
        vec![
            Page {
                number: 1,
                lines: vec!["รายงานการออม".to_string(), String::new(), "a | b".to_string()],
            },
            Page {
                number: 2,
                lines: vec!["c | d".to_string()],
            },
        ]
    }

    #[test]
    fn test_text_sink_separates_pages() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = TextPageSink::new(temp_dir.path().join("out"));

        let files = sink.write_pages("report", &pages()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("report.txt"));

        let content = fs::read_to_string(&files[0]).unwrap();
        let parts: Vec<&str> = content.split('\x0C').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "รายงานการออม\n\na | b\n");
        assert_eq!(parts[1], "c | d");
    }

    #[test]
    fn test_svg_sink_writes_one_file_per_page() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = SvgPageSink::new(temp_dir.path());

        let files = sink.write_pages("report", &pages()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[1].ends_with("report_page_2.svg"));
        for file in &files {
            let svg = fs::read_to_string(file).unwrap();
            assert!(svg.contains("<svg"));
        }
    }
}
