use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use super::image_file::ImageFile;

/// Images sharing a group name, ordered by sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub name: String,
    pub images: Vec<ImageFile>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Result of grouping a directory listing
#[derive(Debug, Default)]
pub struct PageSet {
    /// Pages in group-name order
    pub pages: Vec<Page>,
    /// Entries that are not `name_number.jpg`
    pub skipped: Vec<PathBuf>,
}

impl PageSet {
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }
}

/// Groups paths into pages
///
/// Files are ordered by group name, then by numeric sequence, and split at
/// every change of group name. Two files with the same group and sequence end
/// up next to each other in unspecified order.
pub fn build_pages<I>(paths: I) -> PageSet
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut images = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        match ImageFile::from_path(path.clone()) {
            Ok(image) => images.push(image),
            Err(e) => {
                warn!("⚠️ skipping {}: {}", path.display(), e);
                skipped.push(path);
            }
        }
    }

    PageSet {
        pages: group_images(images),
        skipped,
    }
}

/// Sorts and partitions already-parsed images
pub fn group_images(mut images: Vec<ImageFile>) -> Vec<Page> {
    images.sort_by(|a, b| {
        a.group_name
            .cmp(&b.group_name)
            .then(a.sequence_number.cmp(&b.sequence_number))
    });

    let mut pages: Vec<Page> = Vec::new();
    for image in images {
        match pages.last_mut() {
            Some(page) if page.name == image.group_name => page.images.push(image),
            _ => pages.push(Page {
                name: image.group_name.clone(),
                images: vec![image],
            }),
        }
    }

    pages
}
