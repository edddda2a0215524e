//! Output units and the per-scope registry that multiplexes them.
//!
//! A unit is one generated page. Overloaded declarations sharing a name
//! write into the same unit, so the registry hands back the existing unit
//! on every occurrence after the first. Units are registered against the
//! scope that contains the symbol and released when that scope pops; the
//! accounting is checked, and a mismatch is a defect in the traversal, not
//! an input error.

use std::fmt;
use std::path::PathBuf;

pub const PAGE_EXTENSION: &str = "html";

/// Fixed closing marker appended to every unit before it is closed.
pub const PAGE_FOOTER: &str = "</section></div></main></body></html>";

/// Where a unit's page lands under the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitPath {
    pub module_prefixes: Vec<String>,
    pub file_name: String,
}

impl UnitPath {
    /// Canonical path string, also the registry key.
    pub fn canonical(&self) -> String {
        let mut path = self.module_prefixes.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(&self.file_name);
        path
    }
}

/// Key of an open unit within the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitKey(String);

/// An open, appendable output page. Appends go to an in-memory buffer;
/// the buffer only reaches the filesystem after the unit is released as a
/// [`RenderedPage`].
#[derive(Debug)]
pub struct OutputUnit {
    path: UnitPath,
    buf: String,
    sealed: bool,
}

impl OutputUnit {
    fn new(path: UnitPath) -> Self {
        Self {
            path,
            buf: String::new(),
            sealed: false,
        }
    }

    fn seal(&mut self) {
        assert!(!self.sealed, "output unit {} sealed twice", self.path.canonical());
        self.buf.push_str(PAGE_FOOTER);
        self.sealed = true;
    }

    fn into_page(self) -> RenderedPage {
        RenderedPage {
            module_prefixes: self.path.module_prefixes,
            file_name: self.path.file_name,
            contents: self.buf,
        }
    }
}

impl fmt::Write for OutputUnit {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        assert!(
            !self.sealed,
            "render into already-closed output unit {}",
            self.path.canonical()
        );
        self.buf.push_str(s);
        Ok(())
    }
}

/// A finished page ready to be written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    pub module_prefixes: Vec<String>,
    pub file_name: String,
    pub contents: String,
}

impl RenderedPage {
    pub fn rel_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for prefix in &self.module_prefixes {
            path.push(prefix);
        }
        path.push(&self.file_name);
        path
    }
}

/// Units grouped by the scope that owns them, in open order.
#[derive(Debug, Default)]
struct Frame {
    units: Vec<OutputUnit>,
}

#[derive(Debug, Default)]
pub struct UnitRegistry {
    frames: Vec<Frame>,
    finished: Vec<RenderedPage>,
}

impl UnitRegistry {
    /// Opens a frame for a newly entered scope. Units opened afterwards
    /// belong to it until the matching [`Self::pop_frame`].
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Releases the top frame. Every unit in it must have been sealed
    /// first; an unsealed unit here means open/close accounting broke.
    pub fn pop_frame(&mut self) {
        let frame = self
            .frames
            .pop()
            .expect("popped unit registry past the root frame");
        for unit in &frame.units {
            assert!(
                unit.sealed,
                "unit {} left open before popping its scope",
                unit.path.canonical()
            );
        }
        self.finished
            .extend(frame.units.into_iter().map(OutputUnit::into_page));
    }

    /// Opens the unit at `path`, or returns the one already open there.
    /// The boolean is true on first occurrence, when the caller is expected
    /// to write the page chrome.
    pub fn open(&mut self, path: UnitPath) -> (UnitKey, bool) {
        let key = UnitKey(path.canonical());
        let frame = self
            .frames
            .last_mut()
            .expect("opened a unit with no scope frame");
        if frame.units.iter().any(|unit| unit.path == path) {
            return (key, false);
        }
        frame.units.push(OutputUnit::new(path));
        (key, true)
    }

    /// Appendable writer for an open unit, wherever in the scope stack it
    /// was registered.
    pub fn writer(&mut self, key: &UnitKey) -> &mut OutputUnit {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| {
                frame
                    .units
                    .iter_mut()
                    .find(|unit| unit.path.canonical() == key.0)
            })
            .unwrap_or_else(|| panic!("no open output unit for {}", key.0))
    }

    /// Writes the closing marker and refuses further appends. Used for
    /// uniquely-named symbols, which close as soon as their own subtree is
    /// done; overloadable units instead stay open until their owning scope
    /// finishes.
    pub fn seal(&mut self, key: &UnitKey) {
        self.writer(key).seal();
    }

    /// Seals whatever the top frame still has open. Called once per scope,
    /// after its members are traversed: this is where overload units that
    /// were left open for later siblings finally get their closing marker.
    pub fn seal_open_units(&mut self) {
        let frame = self
            .frames
            .last_mut()
            .expect("sealed units with no scope frame");
        for unit in frame.units.iter_mut().filter(|unit| !unit.sealed) {
            unit.seal();
        }
    }

    /// Number of units still registered, across all frames.
    pub fn open_unit_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.units.len()).sum()
    }

    /// All released pages, in release order. Panics if any frame is still
    /// open.
    pub fn into_pages(self) -> Vec<RenderedPage> {
        assert!(
            self.frames.is_empty(),
            "unit registry torn down with {} scope frame(s) still open",
            self.frames.len()
        );
        self.finished
    }
}
