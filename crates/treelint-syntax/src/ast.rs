//! Syntax tree types for parsed source files.
//!
//! A [`SyntaxTree`] is an arena of [`Node`]s addressed by [`NodeId`]. Every
//! node except the root keeps the id of its parent, so lint code can walk
//! from any node outward to the file without back-references or shared
//! ownership. Trees are immutable once built; they are produced by
//! [`crate::parse_string`] or assembled by hand with [`TreeBuilder`].
//!
//! # Tree Structure
//!
//! ```text
//! File                        (root, carries @file: annotations)
//!  ├─ Package                 ("com.example")
//!  ├─ Class / Object / Interface
//!  │    ├─ Parameter          (primary constructor)
//!  │    ├─ Function
//!  │    │    ├─ Parameter
//!  │    │    └─ Function      (local functions, recursive)
//!  │    └─ Property
//!  └─ Function
//! ```
//!
//! # Example
//!
//! ```
//! use treelint_syntax::{parse_string, NodeKind};
//!
//! let tree = parse_string("fun greet(name: String) = Unit").unwrap();
//! let function = tree.children(tree.root())[0];
//!
//! assert_eq!(tree.get(function).kind, NodeKind::Function);
//! assert_eq!(tree.get(function).name.as_deref(), Some("greet"));
//! assert_eq!(tree.parent(function), Some(tree.root()));
//! ```

use serde::{Deserialize, Serialize};

/// A position (line, column, byte offset) in the source text.
///
/// Lines and columns are 1-based; `offset` is a 0-based byte offset suitable
/// for slicing the original source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// 0-based byte offset in the source string.
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// A half-open source range defined by a start and end [`Position`].
///
/// `start` is inclusive, `end` is exclusive (one past the last character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start position.
    pub start: Position,
    /// Exclusive end position.
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The syntactic category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// The root of every tree.
    File,
    /// `package a.b.c` header.
    Package,
    Class,
    Object,
    Interface,
    /// A named function, top-level, member or local.
    Function,
    /// A function or primary constructor parameter.
    Parameter,
    /// A `val` / `var` declaration.
    Property,
}

impl NodeKind {
    /// Returns true for class-like declarations (class, object, interface).
    pub fn is_class_like(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Object | NodeKind::Interface)
    }
}

/// An annotation attached to a node, e.g. `@Suppress("LongMethod")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type as written (`Suppress`, `kotlin.Suppress`, ...).
    pub name: String,
    /// Use-site target such as `file` in `@file:Suppress(...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_site: Option<String>,
    /// String literal arguments in source order.
    #[serde(default)]
    pub args: Vec<String>,
    pub span: Span,
}

impl Annotation {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            use_site: None,
            args,
            span: Span::default(),
        }
    }

    /// Annotation name without its package qualifier (`kotlin.Suppress` -> `Suppress`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A single node of the syntax tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Declared name; `None` for the file root and anonymous declarations.
    pub name: Option<String>,
    /// Span of the name token when the node has a name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_span: Option<Span>,
    /// Span of the whole declaration including annotations and modifiers.
    pub span: Span,
    /// Modifier keywords in source order (`private`, `override`, ...).
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Declared return type of a function, as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            name_span: None,
            span: Span::default(),
            modifiers: Vec::new(),
            return_type: None,
            annotations: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_name_span(mut self, span: Span) -> Self {
        self.name_span = Some(span);
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Check if the node carries a modifier keyword
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// Span used when reporting on this node: the name if present, else the whole node.
    pub fn report_span(&self) -> Span {
        self.name_span.unwrap_or(self.span)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An immutable tree of nodes for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxTree {
    file_name: String,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Name of the file the tree was parsed from (`"Test.kt"` for in-memory sources).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The `File` root node. Always index 0.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Number of nodes in the tree, which also bounds its depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate from `id` outward to the root, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
            remaining: self.nodes.len(),
        }
    }

    /// Depth-first, parent-before-children traversal from the root.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Iterate over all nodes of a given kind in preorder
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder().filter(move |id| self.get(*id).kind == kind)
    }

    /// Nearest proper ancestor that is a class, object or interface.
    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .find(|ancestor| self.get(*ancestor).kind.is_class_like())
    }
}

/// Iterator over a node and its ancestors, see [`SyntaxTree::ancestors`].
///
/// Stops after visiting at most as many nodes as the tree holds, so a
/// corrupted parent chain cannot loop forever.
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Depth-first iterator over all nodes, see [`SyntaxTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}

/// Incremental construction of a [`SyntaxTree`].
///
/// The builder starts with a `File` root; every added node is linked to the
/// parent passed in, which keeps parent and child lists consistent.
///
/// ```
/// use treelint_syntax::{Annotation, Node, NodeKind, TreeBuilder};
///
/// let mut builder = TreeBuilder::new("Sample.kt");
/// let class = builder.add(
///     builder.root(),
///     Node::new(NodeKind::Class)
///         .with_name("Sample")
///         .with_annotation(Annotation::new("Suppress", vec!["all".into()])),
/// );
/// builder.add(class, Node::new(NodeKind::Function).with_name("run"));
/// let tree = builder.build();
///
/// assert_eq!(tree.len(), 3);
/// ```
pub struct TreeBuilder {
    file_name: String,
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            nodes: vec![Node::new(NodeKind::File)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent` and return its id.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Mutable access to an already added node (annotations, spans, ...).
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn build(self) -> SyntaxTree {
        SyntaxTree {
            file_name: self.file_name,
            nodes: self.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SyntaxTree {
        let mut builder = TreeBuilder::new("Sample.kt");
        let class = builder.add(builder.root(), Node::new(NodeKind::Class).with_name("A"));
        let function = builder.add(class, Node::new(NodeKind::Function).with_name("f"));
        builder.add(function, Node::new(NodeKind::Parameter).with_name("x"));
        builder.add(class, Node::new(NodeKind::Function).with_name("g"));
        builder.add(builder.root(), Node::new(NodeKind::Function).with_name("h"));
        builder.build()
    }

    fn names(tree: &SyntaxTree, ids: impl Iterator<Item = NodeId>) -> Vec<String> {
        ids.map(|id| tree.get(id).name.clone().unwrap_or_else(|| "<file>".to_string()))
            .collect()
    }

    #[test]
    fn test_preorder_visits_parents_first_in_source_order() {
        let tree = sample_tree();
        assert_eq!(
            names(&tree, tree.preorder()),
            vec!["<file>", "A", "f", "x", "g", "h"]
        );
    }

    #[test]
    fn test_ancestors_include_start_node_and_root() {
        let tree = sample_tree();
        let x = tree.nodes_of_kind(NodeKind::Parameter).next().unwrap();
        assert_eq!(names(&tree, tree.ancestors(x)), vec!["x", "f", "A", "<file>"]);
    }

    #[test]
    fn test_ancestors_terminate_on_cyclic_parents() {
        let mut tree = sample_tree();
        // Corrupt the tree: the class claims the function as its parent.
        tree.nodes[1].parent = Some(NodeId(2));
        let x = NodeId(3);
        let visited: Vec<NodeId> = tree.ancestors(x).collect();
        assert_eq!(visited.len(), tree.len());
    }

    #[test]
    fn test_enclosing_class() {
        let tree = sample_tree();
        let f = NodeId(2);
        let h = NodeId(5);
        assert_eq!(tree.enclosing_class(f), Some(NodeId(1)));
        assert_eq!(tree.enclosing_class(h), None);
        assert_eq!(tree.enclosing_class(NodeId(1)), None);
    }

    #[test]
    fn test_annotation_simple_name() {
        let annotation = Annotation::new("kotlin.Suppress", vec![]);
        assert_eq!(annotation.simple_name(), "Suppress");
        assert_eq!(Annotation::new("Suppress", vec![]).simple_name(), "Suppress");
    }
}
