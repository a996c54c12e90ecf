//! Named symbols and references
//!
//! A [`Scope`] mints [`Symbol`]s during one declaration pass. Symbols are
//! attached to nodes when the diagram is declared; relations then address
//! nodes through [`Reference`]s, which may walk into a named node's subtree
//! by local name or child index and may pick an [`Anchor`] on the result.

use std::fmt;

use indexmap::IndexMap;

use super::anchor::Anchor;
use super::error::LayoutError;
use super::find_similar;

/// Characters a literal name may not contain
pub const RESERVED_CHARS: [char; 5] = ['#', '.', '[', ']', '@'];

/// Opaque identifier for a named node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(usize);

#[derive(Debug, Clone)]
struct SymbolEntry {
    /// Human-facing name
    label: String,
    /// Unique name used for solver variables
    key: String,
}

/// Registry of the names minted for one diagram
#[derive(Debug, Clone, Default)]
pub struct Scope {
    names: IndexMap<String, Symbol>,
    entries: Vec<SymbolEntry>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self, label: String, key: String) -> Symbol {
        let symbol = Symbol(self.entries.len());
        self.entries.push(SymbolEntry { label, key });
        symbol
    }

    /// Mint a symbol for a literal name. Each literal may be minted once.
    ///
    /// Names may not be empty or contain whitespace or any of
    /// [`RESERVED_CHARS`]; those mark reference segments, anchors and
    /// generated solver keys.
    pub fn name(&mut self, name: impl Into<String>) -> Result<Symbol, LayoutError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LayoutError::invalid_name(name, "names may not be empty"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| c.is_whitespace() || RESERVED_CHARS.contains(c))
        {
            return Err(LayoutError::invalid_name(
                name.clone(),
                format!("'{}' is reserved", c),
            ));
        }
        if self.names.contains_key(&name) {
            return Err(LayoutError::collision(name));
        }
        let symbol = self.mint(name.clone(), name.clone());
        self.names.insert(name, symbol);
        Ok(symbol)
    }

    /// Mint one fresh symbol per entry.
    ///
    /// List symbols are not registered under their literal names, so two
    /// lists may reuse the same labels without colliding.
    pub fn name_list<I, S>(&mut self, names: I) -> Vec<Symbol>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| {
                let label = name.into();
                let key = format!("{}#{}", label, self.entries.len());
                self.mint(label, key)
            })
            .collect()
    }

    /// Like [`Scope::name_list`], keyed by the given names
    pub fn name_map<I, S>(&mut self, keys: I) -> IndexMap<String, Symbol>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let symbols = self.name_list(keys.iter().cloned());
        keys.into_iter().zip(symbols).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.names.get(name).copied()
    }

    /// Look up a literal name, suggesting close matches on failure
    pub fn resolve(&self, name: &str) -> Result<Symbol, LayoutError> {
        self.lookup(name)
            .ok_or_else(|| LayoutError::unresolvable(name, self.suggestions(name)))
    }

    pub fn suggestions(&self, name: &str) -> Vec<String> {
        find_similar(self.names.keys().map(String::as_str), name, 2)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol.0 < self.entries.len()
    }

    pub fn label(&self, symbol: Symbol) -> &str {
        self.entries
            .get(symbol.0)
            .map(|e| e.label.as_str())
            .unwrap_or("<foreign symbol>")
    }

    pub fn key(&self, symbol: Symbol) -> &str {
        self.entries
            .get(symbol.0)
            .map(|e| e.key.as_str())
            .unwrap_or("<foreign symbol>")
    }

    /// Literal names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a reference starts
#[derive(Debug, Clone, PartialEq)]
pub enum RefRoot {
    Symbol(Symbol),
    Name(String),
}

/// One step into a named node's subtree
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// First descendant carrying this local name
    Local(String),
    /// The i-th child
    Index(usize),
}

/// Address of a node, optionally narrowed to an anchor point
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub root: RefRoot,
    pub path: Vec<Segment>,
    pub anchor: Option<Anchor>,
}

impl Reference {
    pub fn symbol(symbol: Symbol) -> Self {
        Self {
            root: RefRoot::Symbol(symbol),
            path: vec![],
            anchor: None,
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            root: RefRoot::Name(name.into()),
            path: vec![],
            anchor: None,
        }
    }

    /// Descend to a locally named descendant
    pub fn child(mut self, local: impl Into<String>) -> Self {
        self.path.push(Segment::Local(local.into()));
        self
    }

    /// Descend to the i-th child
    pub fn index(mut self, index: usize) -> Self {
        self.path.push(Segment::Index(index));
        self
    }

    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Parse `name(.local|[index])*(@anchor)?`, e.g. `matrix[2].dot@top-left`
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let malformed = || LayoutError::unresolvable(source, vec![]);
        let is_separator = |c: char| c == '.' || c == '[';

        let (body, anchor) = match source.rsplit_once('@') {
            Some((body, anchor)) => (body, Some(anchor.parse::<Anchor>()?)),
            None => (source, None),
        };
        let body = body.trim();

        let root_end = body.find(is_separator).unwrap_or(body.len());
        let root = &body[..root_end];
        if root.is_empty() {
            return Err(malformed());
        }

        let mut path = Vec::new();
        let mut rest = &body[root_end..];
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(is_separator).unwrap_or(after.len());
                if end == 0 {
                    return Err(malformed());
                }
                path.push(Segment::Local(after[..end].to_string()));
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(malformed)?;
                let index = after[..close]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| malformed())?;
                path.push(Segment::Index(index));
                rest = &after[close + 1..];
            } else {
                return Err(malformed());
            }
        }

        Ok(Self {
            root: RefRoot::Name(root.to_string()),
            path,
            anchor,
        })
    }

    /// Render the reference with symbol labels from `scope`
    pub fn describe(&self, scope: &Scope) -> String {
        let mut out = match &self.root {
            RefRoot::Symbol(symbol) => scope.label(*symbol).to_string(),
            RefRoot::Name(name) => name.clone(),
        };
        out.push_str(&PathDisplay(&self.path).to_string());
        if let Some(anchor) = self.anchor {
            out.push('@');
            out.push_str(anchor.name());
        }
        out
    }
}

impl From<Symbol> for Reference {
    fn from(symbol: Symbol) -> Self {
        Self::symbol(symbol)
    }
}

struct PathDisplay<'a>(&'a [Segment]);

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.0 {
            match segment {
                Segment::Local(name) => write!(f, ".{}", name)?,
                Segment::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}
