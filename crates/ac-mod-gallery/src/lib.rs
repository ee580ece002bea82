//! Image carousel: a cyclic index over a fixed image list that auto-advances
//! on an interval and sizes its container from each image's natural
//! dimensions.
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use globset::{Glob, GlobSet, GlobSetBuilder};
use image::RgbImage;
use image::imageops::FilterType;

use ac_base::config::GallerySettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub path: PathBuf,
    /// Natural (width, height) in pixels, if the header could be read.
    pub natural: Option<(u32, u32)>,
}

impl GalleryImage {
    pub fn file_name(&self) -> String {
        self.path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
    }
}

/// Height that keeps the image's aspect ratio at the given container width.
pub fn aspect_height(container_width: u16, natural: Option<(u32, u32)>) -> Option<u16> {
    let (w, h) = natural?;
    if w == 0 || container_width == 0 {
        return None;
    }
    let height = (container_width as u64 * h as u64) / w as u64;
    Some(height.min(u16::MAX as u64) as u16)
}

/// Downscaled pixels for one image at one size.
struct Thumbnail {
    index: usize,
    size: (u32, u32),
    pixels: Option<RgbImage>,
}

pub struct Gallery {
    images: Vec<GalleryImage>,
    current: usize,
    interval: Duration,
    last_advance: Instant,
    container_width: u16,
    container_height: Option<u16>,
    thumbnail: Option<Thumbnail>,
}

impl Gallery {
    pub fn new(images: Vec<GalleryImage>, interval: Duration, now: Instant) -> Self {
        let mut gallery = Self {
            images,
            current: 0,
            interval,
            last_advance: now,
            container_width: 0,
            container_height: None,
            thumbnail: None,
        };
        gallery.show(0, now);
        gallery
    }

    /// Scan the configured directory (relative paths resolve against `root`).
    pub fn from_settings(settings: &GallerySettings, root: &Path, now: Instant) -> Self {
        let dir = root.join(&settings.dir);
        Self::new(scan(&dir, &settings.patterns), Duration::from_millis(settings.interval_ms), now)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn current(&self) -> Option<&GalleryImage> {
        self.images.get(self.current)
    }

    pub fn container_height(&self) -> Option<u16> {
        self.container_height
    }

    fn show(&mut self, index: usize, now: Instant) {
        if index >= self.images.len() {
            return;
        }
        self.current = index;
        self.last_advance = now;
        self.container_height = aspect_height(self.container_width, self.images[index].natural);
    }

    pub fn next(&mut self, now: Instant) {
        if self.images.is_empty() {
            return;
        }
        self.show((self.current + 1) % self.images.len(), now);
    }

    pub fn prev(&mut self, now: Instant) {
        if self.images.is_empty() {
            return;
        }
        let len = self.images.len();
        self.show((self.current + len - 1) % len, now);
    }

    /// Dot selection. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.images.len() {
            return false;
        }
        self.show(index, now);
        true
    }

    /// Auto-advance once the interval has elapsed. Returns true if the
    /// shown image changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.images.len() < 2 || now.saturating_duration_since(self.last_advance) < self.interval {
            return false;
        }
        self.next(now);
        true
    }

    /// Container width changed; recompute the height for the shown image.
    pub fn resize(&mut self, width: u16) {
        if width == self.container_width {
            return;
        }
        self.container_width = width;
        self.container_height = aspect_height(width, self.current().and_then(|img| img.natural));
    }

    /// The shown image resized to exactly `width` x `height` pixels. Decoded
    /// once per image and size; unreadable files yield `None`.
    pub fn thumbnail(&mut self, width: u32, height: u32) -> Option<&RgbImage> {
        if width == 0 || height == 0 {
            return None;
        }
        let index = self.current;
        let stale = self.thumbnail.as_ref().is_none_or(|t| t.index != index || t.size != (width, height));
        if stale {
            let path = &self.images.get(index)?.path;
            let pixels = match image::open(path) {
                Ok(img) => Some(img.resize_exact(width, height, FilterType::Triangle).to_rgb8()),
                Err(e) => {
                    tracing::debug!(path = %path.display(), "cannot decode gallery image: {}", e);
                    None
                }
            };
            self.thumbnail = Some(Thumbnail { index, size: (width, height), pixels });
        }
        self.thumbnail.as_ref().and_then(|t| t.pixels.as_ref())
    }
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => tracing::warn!(pattern = %pattern, "ignoring invalid gallery pattern: {}", e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("gallery patterns unusable: {}", e);
        GlobSet::empty()
    })
}

/// Image files directly under `dir` whose names match `patterns`, sorted by
/// name. A missing directory yields an empty list.
pub fn scan(dir: &Path, patterns: &[String]) -> Vec<GalleryImage> {
    let set = build_globset(patterns);
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "gallery directory unavailable: {}", e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.file_name().is_some_and(|name| set.is_match(name)))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let natural = match image::image_dimensions(&path) {
                Ok(dims) => Some(dims),
                Err(e) => {
                    tracing::debug!(path = %path.display(), "cannot read image dimensions: {}", e);
                    None
                }
            };
            GalleryImage { path, natural }
        })
        .collect()
}
