//! The radix tree every route pattern is stored in.
//!
//! One tree holds all methods. Each node owns a run of static bytes or a
//! single wildcard segment, and terminal nodes map methods to routes.
//! Static children are indexed by their first byte in `indices`, kept
//! parallel to `children`. A node has at most one wildcard child, which is
//! always stored last and has no entry in `indices`.

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::Arc;

use hyper::Method;

use crate::error::InsertError;
use crate::params::Params;
use crate::route::Route;

/// The role of a node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// The top of the tree, owning no path of its own.
    Root,
    /// Literal path bytes.
    Static,
    /// A single segment parameter, ex: `/:id`.
    Param { name: String },
    /// The remainder of the path, ex: `/*file`.
    CatchAll { name: String },
}

impl NodeKind {
    fn is_wildcard(&self) -> bool {
        matches!(self, NodeKind::Param { .. } | NodeKind::CatchAll { .. })
    }
}

pub(crate) struct Node {
    pub(crate) path: Vec<u8>,
    pub(crate) kind: NodeKind,
    pub(crate) wild_child: bool,
    pub(crate) indices: Vec<u8>,
    pub(crate) children: Vec<Node>,
    pub(crate) priority: u32,
    pub(crate) handlers: HashMap<Method, Arc<Route>>,
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new(Vec::new(), NodeKind::Root)
    }

    fn new(path: Vec<u8>, kind: NodeKind) -> Self {
        Self {
            path,
            kind,
            wild_child: false,
            indices: Vec::new(),
            children: Vec::new(),
            priority: 0,
            handlers: HashMap::new(),
        }
    }

    /// Stores `route` under `method` at the end of `pattern`.
    ///
    /// Registering the same method and pattern twice replaces the earlier route.
    pub(crate) fn insert(
        &mut self,
        method: Method,
        pattern: &str,
        route: Arc<Route>,
    ) -> Result<(), InsertError> {
        validate(pattern)?;
        self.check_conflicts(pattern)?;

        let mut path = pattern.as_bytes();
        let mut current = self;
        current.priority += 1;

        loop {
            let common = longest_common_prefix(path, &current.path);

            // the node owns more than the shared prefix, split it
            if common < current.path.len() {
                if current.kind.is_wildcard() {
                    return Err(conflict(pattern, path, current));
                }
                current.split(common);
            }

            if common == path.len() {
                current.handlers.insert(method, route);
                return Ok(());
            }

            path = &path[common..];
            let next = path[0];

            if next == b':' || next == b'*' {
                if !current.wild_child {
                    return current.insert_child(path, method, route);
                }

                // the wildcard must be the exact one already registered here
                let wildcard = current.children.len() - 1;
                let wanted = segment(path);
                let child = &current.children[wildcard];
                if child.path != wanted {
                    return Err(conflict(pattern, path, child));
                }

                current = &mut current.children[wildcard];
                current.priority += 1;
                continue;
            }

            if let Some(i) = current.indices.iter().position(|&c| c == next) {
                let i = current.bump_child_priority(i);
                current = &mut current.children[i];
                continue;
            }

            // no static child starts with this byte, create one
            current.indices.push(next);
            let i = current.add_static_child(Node::new(Vec::new(), NodeKind::Static));
            let i = current.bump_child_priority(i);
            return current.children[i].insert_child(path, method, route);
        }
    }

    // walks the path `insert` would take without touching anything, so a
    // rejected pattern leaves priorities and child order as they were
    fn check_conflicts(&self, pattern: &str) -> Result<(), InsertError> {
        let mut path = pattern.as_bytes();
        let mut current = self;

        loop {
            let common = longest_common_prefix(path, &current.path);

            if common < current.path.len() {
                if current.kind.is_wildcard() {
                    return Err(conflict(pattern, path, current));
                }
                // a split starts a fresh branch below this point
                return Ok(());
            }

            if common == path.len() {
                return Ok(());
            }

            path = &path[common..];
            let next = path[0];

            if next == b':' || next == b'*' {
                if !current.wild_child {
                    return Ok(());
                }

                let child = &current.children[current.children.len() - 1];
                if child.path != segment(path) {
                    return Err(conflict(pattern, path, child));
                }
                current = child;
                continue;
            }

            match current.indices.iter().position(|&c| c == next) {
                Some(i) => current = &current.children[i],
                None => return Ok(()),
            }
        }
    }

    // moves everything past `at` into a single new child
    fn split(&mut self, at: usize) {
        let child = Node {
            path: self.path.split_off(at),
            kind: NodeKind::Static,
            wild_child: self.wild_child,
            indices: mem::take(&mut self.indices),
            children: mem::take(&mut self.children),
            priority: self.priority - 1,
            handlers: mem::take(&mut self.handlers),
        };

        self.indices = vec![child.path[0]];
        self.children = vec![child];
        self.wild_child = false;
    }

    // add a static child node, keeping the wildcard child at the end
    fn add_static_child(&mut self, child: Node) -> usize {
        let len = self.children.len();

        if self.wild_child {
            self.children.insert(len - 1, child);
            len - 1
        } else {
            self.children.push(child);
            len
        }
    }

    // increments the priority of the given static child and moves it in
    // front of any sibling with a lower priority.
    //
    // returns the new index of the child
    fn bump_child_priority(&mut self, i: usize) -> usize {
        self.children[i].priority += 1;
        let priority = self.children[i].priority;

        let mut updated = i;
        while updated > 0 && self.children[updated - 1].priority < priority {
            self.children.swap(updated - 1, updated);
            updated -= 1;
        }

        // keep the index bytes aligned with the children
        if updated != i {
            let index = self.indices.remove(i);
            self.indices.insert(updated, index);
        }

        updated
    }

    // fills a node with the rest of a pattern, creating wildcard nodes and
    // the literal runs between them
    fn insert_child(
        &mut self,
        mut path: &[u8],
        method: Method,
        route: Arc<Route>,
    ) -> Result<(), InsertError> {
        let mut current = self;

        loop {
            let (wildcard, index) = match find_wildcard(path) {
                Some(found) => found,
                None => {
                    current.path = path.to_vec();
                    current.handlers.insert(method, route);
                    return Ok(());
                }
            };

            // the literal before the wildcard belongs to the current node
            if index > 0 {
                current.path = path[..index].to_vec();
                path = &path[index..];
            }

            let name = String::from_utf8_lossy(&wildcard[1..]).into_owned();
            let kind = match wildcard[0] {
                b':' => NodeKind::Param { name },
                _ => NodeKind::CatchAll { name },
            };

            let mut child = Node::new(wildcard.to_vec(), kind);
            child.priority = 1;
            current.children.push(child);
            current.wild_child = true;

            let last = current.children.len() - 1;
            current = &mut current.children[last];
            path = &path[wildcard.len()..];

            if path.is_empty() {
                current.handlers.insert(method, route);
                return Ok(());
            }

            // a literal continues after the parameter, e.g. `/:id/edit`
            let mut child = Node::new(Vec::new(), NodeKind::Static);
            child.priority = 1;
            current.indices.push(path[0]);
            current.children.push(child);
            current = &mut current.children[0];
        }
    }

    /// Finds the route registered for `method` that matches `path`, binding
    /// parameters into `params`.
    ///
    /// Static children are tried before the wildcard child. If a static
    /// branch yields nothing, the wildcard branch is tried instead. A route
    /// whose constraints reject the bound values does not match.
    pub(crate) fn find<'n>(
        &'n self,
        method: &Method,
        path: &[u8],
        params: &mut Params,
    ) -> Option<&'n Arc<Route>> {
        match &self.kind {
            NodeKind::Root | NodeKind::Static => {
                let rest = path.strip_prefix(self.path.as_slice())?;
                if rest.is_empty() {
                    return self
                        .leaf(method, params)
                        .or_else(|| self.empty_catch_all(method, params));
                }
                self.find_child(method, rest, params)
            }
            NodeKind::Param { name } => {
                let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
                if end == 0 {
                    return None;
                }

                let (value, rest) = path.split_at(end);
                let bound = params.len();
                params.push(name, value);

                let found = if rest.is_empty() {
                    self.leaf(method, params)
                } else {
                    self.find_child(method, rest, params)
                };

                if found.is_none() {
                    params.truncate(bound);
                }
                found
            }
            NodeKind::CatchAll { name } => {
                let bound = params.len();
                params.push(name, path);

                let found = self.leaf(method, params);
                if found.is_none() {
                    params.truncate(bound);
                }
                found
            }
        }
    }

    fn find_child<'n>(
        &'n self,
        method: &Method,
        path: &[u8],
        params: &mut Params,
    ) -> Option<&'n Arc<Route>> {
        let first = path[0];
        if let Some(i) = self.indices.iter().position(|&c| c == first) {
            if let Some(found) = self.children[i].find(method, path, params) {
                return Some(found);
            }
        }

        if self.wild_child {
            return self.children.last()?.find(method, path, params);
        }

        None
    }

    fn leaf<'n>(&'n self, method: &Method, params: &Params) -> Option<&'n Arc<Route>> {
        self.handlers
            .get(method)
            .filter(|route| route.validate(params))
    }

    // `/files/` still matches `/files/*path`, binding an empty value
    fn empty_catch_all<'n>(
        &'n self,
        method: &Method,
        params: &mut Params,
    ) -> Option<&'n Arc<Route>> {
        match self.children.last() {
            Some(child) if self.wild_child && matches!(child.kind, NodeKind::CatchAll { .. }) => {
                child.find(method, b"", params)
            }
            _ => None,
        }
    }

    /// Visits every route stored in this subtree.
    pub(crate) fn for_each_route(&self, f: &mut impl FnMut(&Arc<Route>)) {
        self.handlers.values().for_each(|route| f(route));
        for child in &self.children {
            child.for_each_route(f);
        }
    }
}

fn conflict(pattern: &str, path: &[u8], existing: &Node) -> InsertError {
    InsertError::Conflict {
        pattern: pattern.to_owned(),
        segment: String::from_utf8_lossy(segment(path)).into_owned(),
        existing: String::from_utf8_lossy(&existing.path).into_owned(),
    }
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(a, b)| a == b).count()
}

// the path up to the next `/`
fn segment(path: &[u8]) -> &[u8] {
    let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
    &path[..end]
}

// Searches for the next wildcard segment, returning it and its offset.
// Patterns are validated before they reach this point.
fn find_wildcard(path: &[u8]) -> Option<(&[u8], usize)> {
    let start = path.iter().position(|&c| c == b':' || c == b'*')?;
    Some((segment(&path[start..]), start))
}

/// Checks a pattern for malformed wildcards without touching the tree.
fn validate(pattern: &str) -> Result<(), InsertError> {
    wildcard_names(pattern).map(drop)
}

/// Returns the parameter names declared by `pattern`, in order.
pub(crate) fn wildcard_names(pattern: &str) -> Result<Vec<String>, InsertError> {
    let bytes = pattern.as_bytes();
    if bytes.first() != Some(&b'/') {
        return Err(InsertError::MissingLeadingSlash {
            pattern: pattern.to_owned(),
        });
    }

    let mut names = Vec::new();
    let mut offset = 0;

    while let Some((wildcard, index)) = find_wildcard(&bytes[offset..]) {
        let start = offset + index;
        let end = start + wildcard.len();

        if wildcard.len() < 2 {
            return Err(InsertError::UnnamedWildcard {
                pattern: pattern.to_owned(),
            });
        }

        if wildcard[1..].iter().any(|&c| c == b':' || c == b'*') {
            return Err(InsertError::TooManyWildcards {
                pattern: pattern.to_owned(),
            });
        }

        if wildcard[0] == b'*' {
            if end != bytes.len() {
                return Err(InsertError::CatchAllNotLast {
                    pattern: pattern.to_owned(),
                });
            }

            if bytes[start - 1] != b'/' {
                return Err(InsertError::CatchAllWithoutSlash {
                    pattern: pattern.to_owned(),
                });
            }
        }

        names.push(String::from_utf8_lossy(&wildcard[1..]).into_owned());
        offset = end;
    }

    Ok(names)
}

// visualize the tree structure when debugging
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices = self.indices.iter().map(|&c| c as char).collect::<String>();
        let methods = self.handlers.keys().map(Method::as_str).collect::<Vec<_>>();

        f.debug_struct("Node")
            .field("path", &String::from_utf8_lossy(&self.path))
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("indices", &indices)
            .field("methods", &methods)
            .field("children", &self.children)
            .finish()
    }
}
