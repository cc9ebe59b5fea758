//! Writing page subsets of a PDF as standalone documents.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::Document as LopdfDocument;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{PageRange, Segment};

/// File stem used as the base of output names ("releves.pdf" -> "releves").
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn load(path: &Path) -> Result<LopdfDocument> {
    detect_format_from_path(path)?;
    Ok(LopdfDocument::load(path)?)
}

/// Copy of `doc` holding only the pages in `range` (0-based).
fn extract_range(doc: &LopdfDocument, range: PageRange) -> Result<LopdfDocument> {
    let total = doc.get_pages().len();
    if range.last >= total {
        return Err(Error::PageOutOfRange(range.last, total));
    }

    let doomed: Vec<u32> = (0..total)
        .filter(|i| !range.contains(*i))
        .map(|i| i as u32 + 1)
        .collect();

    let mut sub = doc.clone();
    sub.delete_pages(&doomed);
    sub.prune_objects();
    sub.renumber_objects();
    sub.compress();
    Ok(sub)
}

fn save(mut doc: LopdfDocument, path: &Path) -> Result<()> {
    doc.save(path)?;
    log::info!("PDF written: {}", path.display());
    Ok(())
}

/// Write one sub-document per segment into `out_dir`.
///
/// Each file is named `{label}.pdf`, the label being
/// [`Segment::label`] of the source file stem. Returns the written paths in
/// segment order.
pub fn write_segments<P: AsRef<Path>, Q: AsRef<Path>>(
    source_pdf: P,
    segments: &[Segment],
    out_dir: Q,
) -> Result<Vec<PathBuf>> {
    let source_pdf = source_pdf.as_ref();
    let out_dir = out_dir.as_ref();
    let doc = load(source_pdf)?;
    let base = base_name(source_pdf);
    fs::create_dir_all(out_dir)?;

    segments
        .iter()
        .map(|segment| {
            let path = out_dir.join(format!("{}.pdf", segment.label(&base)));
            save(extract_range(&doc, segment.pages)?, &path)?;
            Ok(path)
        })
        .collect()
}

/// Write every page of `source_pdf` to its own file.
///
/// Files go to `{out_dir}/{base}_pages/{base}_{n}.pdf` where `n` is the
/// 1-based page number, zero-padded to the digit count of the page count.
pub fn split_pages<P: AsRef<Path>, Q: AsRef<Path>>(source_pdf: P, out_dir: Q) -> Result<Vec<PathBuf>> {
    let source_pdf = source_pdf.as_ref();
    let doc = load(source_pdf)?;
    let base = base_name(source_pdf);
    let total = doc.get_pages().len();
    let width = total.to_string().len();

    let dir = out_dir.as_ref().join(format!("{}_pages", base));
    fs::create_dir_all(&dir)?;

    (0..total)
        .map(|index| {
            let path = dir.join(page_file_name(&base, index + 1, width));
            save(extract_range(&doc, PageRange::single(index))?, &path)?;
            Ok(path)
        })
        .collect()
}

/// `{base}_{number}.pdf` with `number` zero-padded to `width` digits.
pub fn page_file_name(base: &str, number: usize, width: usize) -> String {
    format!("{}_{:0width$}.pdf", base, number, width = width)
}
