//! Namespace Scopes
//!
//! Prefix bindings form a chain of frames: each frame points at the frame
//! of the enclosing element. A tag that declares no `xmlns` attributes
//! shares its parent's frame; the first declaration on a tag materializes a
//! new frame whose parent is the enclosing one, so the parent is never
//! mutated. Frames live in an arena and are released in stack order as
//! their tags close.

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Index of a frame in the scope arena
pub type ScopeId = usize;

/// The frame holding the predeclared `xml` and `xmlns` prefixes
pub const ROOT_SCOPE: ScopeId = 0;

#[derive(Debug, Clone)]
struct ScopeFrame {
    parent: Option<ScopeId>,
    /// (prefix, uri) in declaration order; the empty prefix is the default namespace
    bindings: Vec<(String, String)>,
}

/// Arena of namespace scope frames
#[derive(Debug, Clone)]
pub struct NamespaceScopes {
    frames: Vec<ScopeFrame>,
}

impl NamespaceScopes {
    /// Create the arena with the root frame pre-binding `xml` and `xmlns`
    pub fn new() -> Self {
        NamespaceScopes {
            frames: vec![ScopeFrame {
                parent: None,
                bindings: vec![
                    ("xml".to_string(), ns::XML.to_string()),
                    ("xmlns".to_string(), ns::XMLNS.to_string()),
                ],
            }],
        }
    }

    /// Materialize a new empty frame extending `parent`
    pub fn push_frame(&mut self, parent: ScopeId) -> ScopeId {
        self.frames.push(ScopeFrame {
            parent: Some(parent),
            bindings: Vec::new(),
        });
        self.frames.len() - 1
    }

    /// Drop `id` and every frame allocated after it
    pub fn release(&mut self, id: ScopeId) {
        if id > ROOT_SCOPE {
            self.frames.truncate(id);
        }
    }

    /// Drop every frame allocated after `id`, keeping `id` itself
    pub fn truncate_after(&mut self, id: ScopeId) {
        self.frames.truncate(id + 1);
    }

    /// Bind `prefix` in frame `id`, replacing an earlier binding of the same prefix there
    pub fn bind(&mut self, id: ScopeId, prefix: &str, uri: &str) {
        let Some(frame) = self.frames.get_mut(id) else {
            return;
        };
        match frame.bindings.iter_mut().find(|(p, _)| p == prefix) {
            Some(binding) => binding.1 = uri.to_string(),
            None => frame.bindings.push((prefix.to_string(), uri.to_string())),
        }
    }

    /// Resolve a prefix by walking from `id` toward the root
    pub fn resolve(&self, id: ScopeId, prefix: &str) -> Option<&str> {
        let mut current = Some(id);
        while let Some(frame_id) = current {
            let frame = self.frames.get(frame_id)?;
            if let Some((_, uri)) = frame.bindings.iter().find(|(p, _)| p == prefix) {
                return Some(uri.as_str());
            }
            current = frame.parent;
        }
        None
    }

    /// Bindings declared directly in frame `id`
    pub fn own_bindings(&self, id: ScopeId) -> &[(String, String)] {
        self.frames
            .get(id)
            .map(|frame| frame.bindings.as_slice())
            .unwrap_or(&[])
    }

    /// Number of live frames, root included
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl Default for NamespaceScopes {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a qualified name into (prefix, local)
///
/// For attributes, a bare `xmlns` is the default namespace declaration and
/// yields prefix `xmlns` with an empty local part.
pub fn qname(name: &str, attribute: bool) -> (&str, &str) {
    if attribute && name == "xmlns" {
        return ("xmlns", "");
    }
    name.split_once(':').unwrap_or(("", name))
}
