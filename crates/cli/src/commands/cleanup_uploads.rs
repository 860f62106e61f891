//! Upload reconciliation.
//!
//! Compares the files in the uploads directory against the image
//! references stored on product rows and offers to delete the files
//! nothing points at anymore. Interactive; answering anything other than
//! yes deletes nothing.
//!
//! # Usage
//!
//! ```bash
//! boutique-cli cleanup-uploads
//! ```
//!
//! Reads `UPLOADS_DIR` (default `uploads`) for the directory to scan.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use boutique_storefront::db::products::ProductRepository;

use super::CommandError;

/// Errors that can occur during upload cleanup.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Reference query failed.
    #[error("database error: {0}")]
    Database(#[from] boutique_storefront::db::RepositoryError),

    /// Directory listing or prompt I/O failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Filename part of a stored image reference.
///
/// Product rows store references as served paths (`/uploads/abc.jpg`),
/// so the comparison against directory entries happens on the final
/// path segment.
fn reference_filename(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Files present in the directory listing that no reference points at.
///
/// Returns exactly the set difference listing minus referenced, sorted
/// for stable output. References to files not present in the listing are
/// ignored.
#[must_use]
pub fn unused_files(listing: &[String], referenced: &[String]) -> Vec<String> {
    let kept: BTreeSet<&str> = referenced
        .iter()
        .map(|r| reference_filename(r))
        .collect();

    let mut unused: Vec<String> = listing
        .iter()
        .filter(|name| !kept.contains(name.as_str()))
        .cloned()
        .collect();
    unused.sort_unstable();
    unused
}

/// Ask a yes/no question, defaulting to no.
///
/// Only `y` or `yes` (case-insensitive) count as consent; empty input,
/// EOF, and anything else decline.
fn confirm(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

async fn list_directory(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

/// Run the reconciliation.
///
/// Declining the prompt is a normal completion; per-file deletion
/// failures are logged and do not abort the batch.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the directory
/// cannot be listed.
pub async fn run() -> Result<(), CleanupError> {
    let pool = super::connect().await?;

    let uploads_dir =
        PathBuf::from(std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_owned()));

    if !uploads_dir.is_dir() {
        tracing::info!("Uploads directory {} does not exist, nothing to do", uploads_dir.display());
        pool.close().await;
        return Ok(());
    }

    let listing = list_directory(&uploads_dir).await?;
    let referenced = ProductRepository::new(&pool).all_image_refs().await?;

    let unused = unused_files(&listing, &referenced);

    if unused.is_empty() {
        tracing::info!("No unused uploads found ({} files, all referenced)", listing.len());
        pool.close().await;
        return Ok(());
    }

    #[allow(clippy::print_stdout)]
    {
        println!("Found {} unused file(s) in {}:", unused.len(), uploads_dir.display());
        for name in &unused {
            println!("  {name}");
        }
    }

    let consented = confirm(
        "Delete these files?",
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;

    if !consented {
        tracing::info!("Aborted, nothing deleted");
        pool.close().await;
        return Ok(());
    }

    let mut deleted = 0_usize;
    for name in &unused {
        let path = uploads_dir.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted {name}");
                deleted += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to delete {name}: {e}");
            }
        }
    }

    tracing::info!("Cleanup complete: {deleted} of {} file(s) deleted", unused.len());
    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn unused_is_exact_set_difference() {
        let listing = names(&["a.jpg", "b.png", "c.webp", "d.gif"]);
        let referenced = names(&["/uploads/b.png", "/uploads/d.gif"]);

        assert_eq!(unused_files(&listing, &referenced), names(&["a.jpg", "c.webp"]));
    }

    #[test]
    fn all_referenced_means_nothing_unused() {
        let listing = names(&["a.jpg", "b.png"]);
        let referenced = names(&["/uploads/a.jpg", "/uploads/b.png"]);

        assert!(unused_files(&listing, &referenced).is_empty());
    }

    #[test]
    fn references_without_files_are_ignored() {
        let listing = names(&["a.jpg"]);
        let referenced = names(&["/uploads/a.jpg", "/uploads/gone.png"]);

        assert!(unused_files(&listing, &referenced).is_empty());
    }

    #[test]
    fn bare_filename_references_match() {
        let listing = names(&["a.jpg", "b.png"]);
        let referenced = names(&["a.jpg"]);

        assert_eq!(unused_files(&listing, &referenced), names(&["b.png"]));
    }

    #[test]
    fn empty_directory_yields_nothing() {
        assert!(unused_files(&[], &names(&["/uploads/a.jpg"])).is_empty());
    }

    #[test]
    fn confirm_defaults_to_no() {
        let mut output = Vec::new();

        assert!(!confirm("Delete?", &mut &b"\n"[..], &mut output).unwrap());
        assert!(!confirm("Delete?", &mut &b""[..], &mut output).unwrap());
        assert!(!confirm("Delete?", &mut &b"n\n"[..], &mut output).unwrap());
        assert!(!confirm("Delete?", &mut &b"maybe\n"[..], &mut output).unwrap());
    }

    #[test]
    fn confirm_accepts_yes() {
        let mut output = Vec::new();

        assert!(confirm("Delete?", &mut &b"y\n"[..], &mut output).unwrap());
        assert!(confirm("Delete?", &mut &b"YES\n"[..], &mut output).unwrap());
    }

    #[test]
    fn confirm_writes_prompt() {
        let mut output = Vec::new();
        confirm("Delete these files?", &mut &b"n\n"[..], &mut output).unwrap();

        assert_eq!(output, b"Delete these files? [y/N] ");
    }
}
