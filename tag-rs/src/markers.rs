//! Control markers embedded in tag source.
//!
//! `{dm}` and `{delete}` are instructions to the caller, not expressions:
//! they are removed before the template reaches the renderer.
//!
//! | Marker     | Meaning                                             |
//! |------------|-----------------------------------------------------|
//! | `{dm}`     | send the output to the invoking user's DMs          |
//! | `{delete}` | delete the message that triggered the tag           |

pub const DM: &str = "{dm}";
pub const DELETE: &str = "{delete}";

/// Which markers a template carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub dm: bool,
    pub delete: bool,
}

impl Markers {
    pub fn any(self) -> bool {
        self.dm || self.delete
    }
}

/// Remove every `{dm}` and `{delete}` from `template`, reporting which were
/// present.
pub fn strip_markers(template: &str) -> (String, Markers) {
    let markers = Markers {
        dm: template.contains(DM),
        delete: template.contains(DELETE),
    };
    if !markers.any() {
        return (template.to_owned(), markers);
    }
    let stripped = template.replace(DM, "").replace(DELETE, "");
    (stripped, markers)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_markers() {
        let (s, m) = strip_markers("hello {user:username}");
        assert_eq!(s, "hello {user:username}");
        assert!(!m.any());
    }

    #[test]
    fn dm_marker() {
        let (s, m) = strip_markers("{dm}Your warning: {reason}");
        assert_eq!(s, "Your warning: {reason}");
        assert_eq!(m, Markers { dm: true, delete: false });
    }

    #[test]
    fn both_markers_repeated() {
        let (s, m) = strip_markers("{delete}a{dm}b{delete}");
        assert_eq!(s, "ab");
        assert!(m.dm && m.delete);
    }

    #[test]
    fn marker_names_are_case_sensitive() {
        let (s, m) = strip_markers("{DM}");
        assert_eq!(s, "{DM}");
        assert!(!m.any());
    }
}
