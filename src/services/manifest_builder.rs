//! Turns a bucket listing into a photo manifest.
//!
//! Pure transformation: no I/O, the clock and the RNG are passed in so
//! callers (and tests) control every non-deterministic input.
//!
//! Pipeline:
//! 1. strip the `{bucket}/` prefix some listings carry
//! 2. keep keys with an image extension
//! 3. cap the candidate list
//! 4. derive one [`Photo`] per key
//! 5. collect the distinct non-hero categories

use chrono::{DateTime, Utc};
use rand::Rng;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use crate::models::photo::{
    CategoryCount, Manifest, ManifestMeta, Photo, UNCATEGORIZED, is_hero_category,
};

/// Extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 7] = [
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff",
];

/// Upper bound on photos per manifest.
pub const DEFAULT_PHOTO_LIMIT: usize = 500;

/// Exclusive upper bound of the synthetic `views` value.
const VIEWS_CEILING: u32 = 100;

/// A resize/recompress transform appended to a photo URL as a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub width: u32,
    pub quality: u8,
    pub format: &'static str,
}

impl Variant {
    pub const fn new(width: u32, quality: u8, format: &'static str) -> Self {
        Self {
            width,
            quality,
            format,
        }
    }

    pub fn apply(&self, base_url: &str) -> String {
        format!(
            "{}?width={}&quality={}&format={}",
            base_url, self.width, self.quality, self.format
        )
    }
}

pub const PREVIEW: Variant = Variant::new(400, 70, "webp");
pub const MOBILE_PREVIEW: Variant = Variant::new(640, 75, "webp");
pub const TABLET_PREVIEW: Variant = Variant::new(1024, 80, "webp");
pub const DESKTOP_PREVIEW: Variant = Variant::new(1920, 85, "webp");

/// Settings for one manifest build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Bucket name, stripped from keys that carry it as a prefix.
    pub bucket_name: String,
    /// Public origin the `src` URLs are built on, without trailing slash.
    pub public_url: String,
    pub photo_limit: usize,
}

impl BuildOptions {
    pub fn new(bucket_name: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            photo_limit: DEFAULT_PHOTO_LIMIT,
        }
    }

    pub fn with_photo_limit(mut self, limit: usize) -> Self {
        self.photo_limit = limit;
        self
    }
}

/// Lowercased extension including the dot, or `""`.
///
/// A dot in first position (`.jpg`, a hidden file) does not start an
/// extension.
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name[pos..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// `name` without its extension.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// Last path segment of `path`.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Whether the last segment of `key` has an image extension.
pub fn is_image_key(key: &str) -> bool {
    let ext = file_extension(basename(key));
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// First path segment, or `uncategorized` for keys at the bucket root.
pub fn category_of(path: &str) -> &str {
    match path.split_once('/') {
        Some((first, _)) if !first.is_empty() => first,
        _ => UNCATEGORIZED,
    }
}

/// Remove a leading `{bucket}/` from `key`. The bucket name elsewhere in
/// the key is part of a folder or file name and stays.
pub fn strip_bucket_prefix<'a>(key: &'a str, bucket_name: &str) -> &'a str {
    if bucket_name.is_empty() {
        return key;
    }
    key.strip_prefix(bucket_name)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(key)
}

/// Case-insensitive ordering with a byte-order tie break, so `a.jpg` and
/// `B.jpg` sort the way a reader expects and equal-folding names stay stable.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Human-readable alt text: extension dropped, `-`/`_` become spaces, and
/// the first letter of every word is upper-cased.
///
/// `"my-cool_Photo.JPG"` becomes `"My Cool Photo"`.
pub fn alt_text(filename: &str) -> String {
    let spaced = file_stem(filename).replace(['-', '_'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Filter a raw listing down to the image keys a manifest will contain.
///
/// Keys come back with the bucket prefix stripped, in listing order, capped
/// at `opts.photo_limit`.
pub fn select_image_keys<I, S>(keys: I, opts: &BuildOptions) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter(|key| is_image_key(key.as_ref()))
        .take(opts.photo_limit)
        .map(|key| strip_bucket_prefix(key.as_ref(), &opts.bucket_name).to_string())
        .collect()
}

/// Derive the photo record for one (already stripped) key.
pub fn build_photo<R: Rng>(
    clean_path: &str,
    opts: &BuildOptions,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Photo {
    let filename = basename(clean_path);
    let category = category_of(clean_path);
    let src = format!("{}/{}", opts.public_url, clean_path);

    Photo {
        id: format!("{}-{}", category, file_stem(filename)),
        preview_src: Some(PREVIEW.apply(&src)),
        mobile_preview_src: Some(MOBILE_PREVIEW.apply(&src)),
        tablet_preview_src: Some(TABLET_PREVIEW.apply(&src)),
        desktop_preview_src: Some(DESKTOP_PREVIEW.apply(&src)),
        src,
        alt: alt_text(filename),
        category: category.to_string(),
        folder: category.to_string(),
        filename: filename.to_string(),
        uploaded_at: Some(now),
        views: rng.random_range(0..VIEWS_CEILING),
    }
}

/// Distinct non-hero categories of `photos`, alphabetical ignoring case.
pub fn categories_of(photos: &[Photo]) -> Vec<String> {
    let mut categories: Vec<String> = photos
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| !is_hero_category(c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    categories.sort_by(|a, b| natural_cmp(a, b));
    categories
}

/// Per-category photo counts for `categories`, in the same order.
pub fn category_counts(categories: &[String], photos: &[Photo]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for photo in photos {
        *counts.entry(photo.category.as_str()).or_default() += 1;
    }
    categories
        .iter()
        .map(|name| CategoryCount {
            name: name.clone(),
            count: counts.get(name.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Build the full manifest from a raw key listing.
pub fn build_manifest<I, S, R>(
    keys: I,
    opts: &BuildOptions,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Manifest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    R: Rng,
{
    let selected = select_image_keys(keys, opts);
    if selected.is_empty() {
        return Manifest::empty(now);
    }

    let mut photos: Vec<Photo> = selected
        .iter()
        .map(|path| build_photo(path, opts, now, rng))
        .collect();
    photos.sort_by(|a, b| {
        natural_cmp(&a.category, &b.category)
            .then_with(|| natural_cmp(&a.filename, &b.filename))
    });

    let categories = categories_of(&photos);
    let meta = ManifestMeta {
        categories: categories.join(", "),
        total_categories: categories.len(),
        total_photos: photos.len(),
        category_counts: category_counts(&categories, &photos),
    };

    Manifest {
        generated: now,
        total_photos: photos.len(),
        categories,
        photos,
        meta: Some(meta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn opts() -> BuildOptions {
        BuildOptions::new("ns-portfolio-photos", "https://photos.example.com/")
    }

    fn build(keys: &[&str]) -> Manifest {
        let mut rng = StdRng::seed_from_u64(7);
        build_manifest(keys.iter().copied(), &opts(), Utc::now(), &mut rng)
    }

    #[test]
    fn extension_rules() {
        assert_eq!(file_extension("a/b.JPG"), ".jpg");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension(".jpg"), "");
        assert_eq!(file_extension("noext"), "");
        assert!(is_image_key("hero/banner.TIFF"));
        assert!(is_image_key("x/y.bmp"));
        assert!(!is_image_key("readme.txt"));
        assert!(!is_image_key("street/.jpg"));
    }

    #[test]
    fn alt_text_humanizes_filename() {
        assert_eq!(alt_text("my-cool_Photo.JPG"), "My Cool Photo");
        assert_eq!(alt_text("sunset.jpg"), "Sunset");
        assert_eq!(alt_text("a--b.png"), "A  B");
    }

    #[test]
    fn category_falls_back_to_uncategorized() {
        assert_eq!(category_of("solo.jpg"), "uncategorized");
        assert_eq!(category_of("street/a.jpg"), "street");
        assert_eq!(category_of("street/2024/a.jpg"), "street");
    }

    #[test]
    fn bucket_prefix_is_stripped_once() {
        assert_eq!(
            strip_bucket_prefix("ns-portfolio-photos/street/a.jpg", "ns-portfolio-photos"),
            "street/a.jpg"
        );
        assert_eq!(
            strip_bucket_prefix("street/a.jpg", "ns-portfolio-photos"),
            "street/a.jpg"
        );
    }

    #[test]
    fn bucket_name_inside_a_key_is_kept() {
        assert_eq!(
            strip_bucket_prefix("old-ns-portfolio-photos/sunset.jpg", "ns-portfolio-photos"),
            "old-ns-portfolio-photos/sunset.jpg"
        );
        assert_eq!(
            strip_bucket_prefix("street/ns-portfolio-photos/a.jpg", "ns-portfolio-photos"),
            "street/ns-portfolio-photos/a.jpg"
        );
        assert_eq!(
            strip_bucket_prefix("ns-portfolio-photos-old/a.jpg", "ns-portfolio-photos"),
            "ns-portfolio-photos-old/a.jpg"
        );

        let manifest = build(&["old-ns-portfolio-photos/sunset.jpg"]);
        assert_eq!(manifest.categories, vec!["old-ns-portfolio-photos"]);
        assert_eq!(
            manifest.photos[0].src,
            "https://photos.example.com/old-ns-portfolio-photos/sunset.jpg"
        );
    }

    #[test]
    fn hidden_files_are_not_photos() {
        assert!(!is_image_key(".jpg"));
        assert!(!is_image_key("street/2024/.png"));
        assert!(is_image_key("street.v2/a.jpg"));
        assert!(!is_image_key("street.jpg/notes"));

        let manifest = build(&["street/.jpg", "street/a.jpg"]);
        let ids: Vec<_> = manifest.photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["street-a"]);
    }

    #[test]
    fn mixed_listing_builds_expected_manifest() {
        let manifest = build(&[
            "streetphotography/a.jpg",
            "streetphotography/b.png",
            "hero/banner.jpg",
            "readme.txt",
        ]);

        assert_eq!(manifest.photos.len(), 3);
        assert_eq!(manifest.total_photos, 3);
        assert_eq!(manifest.categories, vec!["streetphotography".to_string()]);
        assert_eq!(
            manifest.photos.iter().filter(|p| p.category == "hero").count(),
            1
        );
    }

    #[test]
    fn photo_fields_are_derived_from_key() {
        let manifest = build(&["ns-portfolio-photos/landscapes/misty-Morning.jpeg"]);
        let photo = &manifest.photos[0];

        assert_eq!(photo.id, "landscapes-misty-Morning");
        assert_eq!(
            photo.src,
            "https://photos.example.com/landscapes/misty-Morning.jpeg"
        );
        assert_eq!(
            photo.preview_src.as_deref(),
            Some("https://photos.example.com/landscapes/misty-Morning.jpeg?width=400&quality=70&format=webp")
        );
        assert!(
            photo
                .desktop_preview_src
                .as_deref()
                .is_some_and(|s| s.ends_with("?width=1920&quality=85&format=webp"))
        );
        assert_eq!(photo.alt, "Misty Morning");
        assert_eq!(photo.category, "landscapes");
        assert_eq!(photo.folder, "landscapes");
        assert_eq!(photo.filename, "misty-Morning.jpeg");
        assert_eq!(photo.uploaded_at, Some(manifest.generated));
        assert!(photo.views < 100);
    }

    #[test]
    fn hero_never_listed_as_category() {
        let manifest = build(&["hero/a.jpg", "Hero/b.jpg", "birds/c.jpg", "solo.webp"]);
        assert_eq!(
            manifest.categories,
            vec!["birds".to_string(), "uncategorized".to_string()]
        );
        assert_eq!(manifest.total_photos, 4);
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let manifest = build(&["zoo/1.jpg", "alps/1.jpg", "zoo/2.jpg", "city/1.png"]);
        assert_eq!(manifest.categories, vec!["alps", "city", "zoo"]);

        let meta = manifest.meta.expect("meta present");
        assert_eq!(meta.categories, "alps, city, zoo");
        assert_eq!(meta.total_categories, 3);
        assert_eq!(
            meta.category_counts
                .iter()
                .map(|c| (c.name.as_str(), c.count))
                .collect::<Vec<_>>(),
            vec![("alps", 1), ("city", 1), ("zoo", 2)]
        );
    }

    #[test]
    fn photos_ordered_by_category_then_filename() {
        let manifest = build(&["b/2.jpg", "a/9.jpg", "b/1.jpg"]);
        let ids: Vec<_> = manifest.photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a-9", "b-1", "b-2"]);
    }

    #[test]
    fn ordering_ignores_case() {
        let manifest = build(&["street/B.jpg", "street/a.jpg", "Birds/x.jpg", "alps/y.jpg"]);
        let files: Vec<_> = manifest
            .photos
            .iter()
            .map(|p| format!("{}/{}", p.category, p.filename))
            .collect();
        assert_eq!(
            files,
            vec!["alps/y.jpg", "Birds/x.jpg", "street/a.jpg", "street/B.jpg"]
        );
        assert_eq!(manifest.categories, vec!["alps", "Birds", "street"]);
        assert_eq!(natural_cmp("a", "A"), Ordering::Greater);
    }

    #[test]
    fn empty_or_non_image_listing_gives_empty_manifest() {
        let manifest = build(&[]);
        assert_eq!(manifest.total_photos, 0);
        assert!(manifest.categories.is_empty());
        assert!(manifest.meta.is_none());

        let manifest = build(&["notes.txt", "docs/readme.md"]);
        assert!(manifest.is_empty());
    }

    #[test]
    fn photo_limit_caps_candidates() {
        let keys: Vec<String> = (0..20).map(|i| format!("cat/{i:02}.jpg")).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let manifest = build_manifest(&keys, &opts().with_photo_limit(5), Utc::now(), &mut rng);
        assert_eq!(manifest.total_photos, 5);
        assert_eq!(manifest.photos.len(), 5);
    }

    #[test]
    fn rebuild_from_same_listing_is_stable_apart_from_views() {
        let keys = ["b/x.jpg", "a/y.png", "hero/z.jpg"];
        let now = Utc::now();
        let first = build_manifest(keys, &opts(), now, &mut StdRng::seed_from_u64(1));
        let second = build_manifest(keys, &opts(), now, &mut StdRng::seed_from_u64(2));

        assert_eq!(first.categories, second.categories);
        let strip = |m: &Manifest| {
            m.photos
                .iter()
                .map(|p| Photo { views: 0, ..p.clone() })
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&first), strip(&second));
    }

    #[test]
    fn duplicate_basenames_keep_both_entries() {
        let manifest = build(&["street/a.jpg", "street/a.png"]);
        assert_eq!(manifest.total_photos, 2);
        assert!(manifest.photos.iter().all(|p| p.id == "street-a"));
    }
}
