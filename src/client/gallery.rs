//! Presentation state for the gallery: lightbox, hero banner rotation and
//! the page-level display policy. Nothing here renders; a front end drives
//! these from its input events and timers.

use std::time::Duration;

use crate::models::photo::Photo;

/// Minimum horizontal travel, in pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

pub const DEFAULT_HERO_INTERVAL: Duration = Duration::from_secs(30);

/// Keys the lightbox reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

impl LightboxKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Escape),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

/// Full-screen viewer over the photos currently on screen.
///
/// The selection is tracked by photo id rather than index, so it survives
/// the visible list being re-filtered underneath it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lightbox {
    selected: Option<String>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, photo: &Photo) {
        self.selected = Some(photo.id.clone());
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected photo within `photos`, if it is still there.
    pub fn current<'a>(&self, photos: &'a [Photo]) -> Option<&'a Photo> {
        let id = self.selected.as_deref()?;
        photos.iter().find(|p| p.id == id)
    }

    /// Move by `step` positions, wrapping at both ends.
    ///
    /// A selection no longer present in `photos` restarts from the first
    /// photo going forward, or the last going back.
    pub fn navigate(&mut self, photos: &[Photo], step: isize) {
        let Some(id) = self.selected.as_deref() else {
            return;
        };
        if photos.is_empty() {
            return;
        }
        let len = photos.len() as isize;
        let next = match photos.iter().position(|p| p.id == id) {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.selected = Some(photos[next as usize].id.clone());
    }

    pub fn next(&mut self, photos: &[Photo]) {
        self.navigate(photos, 1);
    }

    pub fn previous(&mut self, photos: &[Photo]) {
        self.navigate(photos, -1);
    }

    /// Apply a key press. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: LightboxKey, photos: &[Photo]) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            LightboxKey::Escape => self.close(),
            LightboxKey::ArrowLeft => self.previous(photos),
            LightboxKey::ArrowRight => self.next(photos),
        }
        true
    }

    /// Apply a horizontal swipe from `start_x` to `end_x`.
    ///
    /// Swiping left shows the next photo, swiping right the previous one.
    /// Movements under [`SWIPE_THRESHOLD_PX`] are taps and ignored.
    pub fn handle_swipe(&mut self, start_x: f64, end_x: f64, photos: &[Photo]) -> bool {
        if !self.is_open() {
            return false;
        }
        let delta = start_x - end_x;
        if delta > SWIPE_THRESHOLD_PX {
            self.next(photos);
            true
        } else if delta < -SWIPE_THRESHOLD_PX {
            self.previous(photos);
            true
        } else {
            false
        }
    }
}

/// Cycles through banner photos on a fixed interval.
#[derive(Debug, Clone)]
pub struct HeroRotation {
    photo_ids: Vec<String>,
    index: usize,
    interval: Duration,
}

impl HeroRotation {
    pub fn new(photos: &[Photo]) -> Self {
        Self {
            photo_ids: photos.iter().map(|p| p.id.clone()).collect(),
            index: 0,
            interval: DEFAULT_HERO_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// How often the timer driving [`HeroRotation::advance`] should fire.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_empty(&self) -> bool {
        self.photo_ids.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_id(&self) -> Option<&str> {
        self.photo_ids.get(self.index).map(String::as_str)
    }

    /// Step to the next banner. No-op with nothing to rotate.
    pub fn advance(&mut self) {
        if !self.photo_ids.is_empty() {
            self.index = (self.index + 1) % self.photo_ids.len();
        }
    }

    /// Jump straight to a banner, as the dot indicators do.
    pub fn select(&mut self, index: usize) {
        if index < self.photo_ids.len() {
            self.index = index;
        }
    }
}

/// Page-level restrictions the front end applies to discourage casual image
/// copying. Purely declarative; enforcement lives in the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    pub disable_context_menu: bool,
    pub disable_text_selection: bool,
    pub block_devtools_shortcuts: bool,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            disable_context_menu: true,
            disable_text_selection: true,
            block_devtools_shortcuts: true,
        }
    }
}

/// A key press as the policy sees it.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyChord<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub shift: bool,
}

impl DisplayPolicy {
    pub fn permissive() -> Self {
        Self {
            disable_context_menu: false,
            disable_text_selection: false,
            block_devtools_shortcuts: false,
        }
    }

    /// Whether the front end should swallow this key press.
    ///
    /// Blocks F12, Ctrl+S, Ctrl+U, Ctrl+Shift+I and Ctrl+Shift+J.
    pub fn blocks_shortcut(&self, chord: KeyChord<'_>) -> bool {
        if !self.block_devtools_shortcuts {
            return false;
        }
        if chord.key == "F12" {
            return true;
        }
        if !chord.ctrl {
            return false;
        }
        let key = chord.key.to_ascii_lowercase();
        if chord.shift {
            matches!(key.as_str(), "i" | "j")
        } else {
            matches!(key.as_str(), "s" | "u")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            src: format!("https://photos.example.com/{id}.jpg"),
            preview_src: None,
            mobile_preview_src: None,
            tablet_preview_src: None,
            desktop_preview_src: None,
            alt: id.to_string(),
            category: "street".into(),
            folder: "street".into(),
            filename: format!("{id}.jpg"),
            uploaded_at: None,
            views: 0,
        }
    }

    fn photos() -> Vec<Photo> {
        vec![photo("a"), photo("b"), photo("c")]
    }

    #[test]
    fn lightbox_wraps_in_both_directions() {
        let list = photos();
        let mut lightbox = Lightbox::new();
        lightbox.open(&list[2]);

        lightbox.next(&list);
        assert_eq!(lightbox.selected_id(), Some("a"));
        lightbox.previous(&list);
        assert_eq!(lightbox.selected_id(), Some("c"));
        assert_eq!(lightbox.current(&list).map(|p| p.id.as_str()), Some("c"));
    }

    #[test]
    fn keys_only_apply_while_open() {
        let list = photos();
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.handle_key(LightboxKey::ArrowRight, &list));

        lightbox.open(&list[0]);
        assert!(lightbox.handle_key(LightboxKey::ArrowRight, &list));
        assert_eq!(lightbox.selected_id(), Some("b"));
        assert!(lightbox.handle_key(LightboxKey::Escape, &list));
        assert!(!lightbox.is_open());
    }

    #[test]
    fn dom_keys_map_to_lightbox_keys() {
        assert_eq!(LightboxKey::from_dom_key("Escape"), Some(LightboxKey::Escape));
        assert_eq!(
            LightboxKey::from_dom_key("ArrowLeft"),
            Some(LightboxKey::ArrowLeft)
        );
        assert_eq!(LightboxKey::from_dom_key("Enter"), None);
    }

    #[test]
    fn swipe_needs_threshold() {
        let list = photos();
        let mut lightbox = Lightbox::new();
        lightbox.open(&list[1]);

        assert!(!lightbox.handle_swipe(200.0, 180.0, &list));
        assert_eq!(lightbox.selected_id(), Some("b"));
        assert!(lightbox.handle_swipe(300.0, 100.0, &list));
        assert_eq!(lightbox.selected_id(), Some("c"));
        assert!(lightbox.handle_swipe(100.0, 300.0, &list));
        assert_eq!(lightbox.selected_id(), Some("b"));
    }

    #[test]
    fn stale_selection_restarts_at_ends() {
        let list = photos();
        let mut lightbox = Lightbox::new();
        lightbox.open(&photo("gone"));

        lightbox.next(&list);
        assert_eq!(lightbox.selected_id(), Some("a"));

        lightbox.open(&photo("gone"));
        lightbox.previous(&list);
        assert_eq!(lightbox.selected_id(), Some("c"));
    }

    #[test]
    fn hero_rotation_cycles() {
        let mut hero = HeroRotation::new(&photos());
        assert_eq!(hero.interval(), DEFAULT_HERO_INTERVAL);
        assert_eq!(hero.current_id(), Some("a"));
        hero.advance();
        hero.advance();
        hero.advance();
        assert_eq!(hero.current_index(), 0);
        hero.select(2);
        assert_eq!(hero.current_id(), Some("c"));
        hero.select(7);
        assert_eq!(hero.current_index(), 2);
    }

    #[test]
    fn empty_hero_rotation_is_inert() {
        let mut hero = HeroRotation::new(&[]).with_interval(Duration::from_secs(5));
        hero.advance();
        assert!(hero.is_empty());
        assert_eq!(hero.current_id(), None);
        assert_eq!(hero.interval(), Duration::from_secs(5));
    }

    #[test]
    fn policy_blocks_devtools_shortcuts() {
        let policy = DisplayPolicy::default();
        let chord = |key, ctrl, shift| KeyChord { key, ctrl, shift };

        assert!(policy.blocks_shortcut(chord("F12", false, false)));
        assert!(policy.blocks_shortcut(chord("s", true, false)));
        assert!(policy.blocks_shortcut(chord("U", true, false)));
        assert!(policy.blocks_shortcut(chord("I", true, true)));
        assert!(policy.blocks_shortcut(chord("j", true, true)));
        assert!(!policy.blocks_shortcut(chord("s", false, false)));
        assert!(!policy.blocks_shortcut(chord("c", true, false)));
        assert!(!DisplayPolicy::permissive().blocks_shortcut(chord("F12", false, false)));
    }
}
