//! Documentation graphs.
//!
//! Every [`Assembler`] can describe the shape it reads and writes. The
//! description is collected into a [`Graph`] and rendered as Graphviz DOT.
//!
//! Nodes are identified by their location path from the root (`Root.items[]`,
//! `Root.limits.key`, ...) and labelled `<segment>: <type label>`, where the
//! segment is what [`Graph::child`] appended to the owner. Edges go from the
//! owner to each child.
//!
//! [`Assembler`]: crate::Assembler

use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::Write;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

/// Collects the nodes and edges of a documentation graph.
///
/// # Examples
///
/// ```
/// use vc_assembler::graph::Graph;
///
/// let mut graph = Graph::new();
/// graph.node("Root", "Config");
/// let port = graph.child("Root", ".port");
/// graph.node(&port, "uint64");
///
/// let dot = graph.render("Root");
/// assert!(dot.contains("\"Root.port\" [label=\"port: uint64\"];"));
/// assert!(dot.contains("\"Root\" -> \"Root.port\";"));
/// ```
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<(String, String)>,
    index: HashMap<String, usize, FixedState>,
    segments: HashMap<String, String, FixedState>,
    edges: Vec<(String, String)>,
    visiting: Vec<TypeId>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels the node at `path` with `type_label`.
    ///
    /// Labelling a path twice replaces the first label.
    pub fn node(&mut self, path: &str, type_label: &str) {
        let segment = self.segments.get(path).map_or(path, String::as_str);
        let label = alloc::format!("{segment}: {type_label}");
        match self.index.get(path) {
            Some(&idx) => self.nodes[idx].1 = label,
            None => {
                self.index.insert(path.into(), self.nodes.len());
                self.nodes.push((path.into(), label));
            }
        }
    }

    /// Adds an edge from `owner` to the path `owner` + `suffix` and returns
    /// that path.
    ///
    /// The child still has to be labelled with [`Graph::node`].
    ///
    /// A suffix starting with `.` opens a new segment. Any other suffix
    /// (`[]`, `?`) extends the owner's segment.
    pub fn child(&mut self, owner: &str, suffix: &str) -> String {
        let path = alloc::format!("{owner}{suffix}");
        let segment = match suffix.strip_prefix('.') {
            Some(name) => String::from(name),
            None => {
                let owner_segment = self.segments.get(owner).map_or(owner, String::as_str);
                alloc::format!("{owner_segment}{suffix}")
            }
        };
        self.segments.insert(path.clone(), segment);
        self.edges.push((owner.into(), path.clone()));
        path
    }

    /// Marks `T` as being described.
    ///
    /// Returns `false` if `T` is already on the stack, i.e. the type is
    /// recursive and must not be expanded again.
    pub fn enter<T: 'static>(&mut self) -> bool {
        let type_id = TypeId::of::<T>();
        if self.visiting.contains(&type_id) {
            return false;
        }
        self.visiting.push(type_id);
        true
    }

    /// Pops the type pushed by the matching [`Graph::enter`].
    pub fn leave(&mut self) {
        self.visiting.pop();
    }

    /// Number of labelled nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Renders the graph as Graphviz DOT.
    pub fn render(&self, name: &str) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = writeln!(out, "digraph \"{}\" {{", escape(name));
        for (path, label) in &self.nodes {
            let _ = writeln!(out, "    \"{}\" [label=\"{}\"];", escape(path), escape(label));
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "    \"{}\" -> \"{}\";", escape(from), escape(to));
        }
        out.push('}');
        out.push('\n');
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
