//! # Tree Drawing
//!
//! Text renderings of a [`GenealogyTree`], for debugging and for piping into
//! external tools:
//!
//! - [`GenealogyTree::debug_draw`] prints the hierarchy with box-drawing
//!   connectors, one node per line, each node followed by its position and
//!   height marker and by its mates.
//! - [`GenealogyTree::dot`] produces a Graphviz `digraph` with solid
//!   parent/child edges and dashed, undirected partnership edges labelled by
//!   relationship id.
//!
//! Neither reads positions or heights for placement; laying the tree out is
//! left to the consumer.

use std::fmt::{self, Write};

use crate::tree::{GenealogyTree, NodeRef};

impl<V> GenealogyTree<V> {
    pub fn draw_fmt<W: Write>(
        &self,
        writer: &mut W,
        node_display: &mut impl FnMut(&V) -> String,
    ) -> fmt::Result {
        let root = self.root_ref();
        write_label(writer, root, node_display)?;

        // (node, prefix of its line, last child of its parent)
        let mut stack = Vec::new();
        push_children(&mut stack, root, "");
        while let Some((node, prefix, is_last_child)) = stack.pop() {
            let connector = if is_last_child {
                "└── "
            } else {
                "├── "
            };
            write!(writer, "{prefix}{connector}")?;
            write_label(writer, node, node_display)?;

            let child_prefix = format!("{}{}", prefix, if is_last_child { "    " } else { "│   " });
            push_children(&mut stack, node, &child_prefix);
        }
        Ok(())
    }

    pub fn debug_draw(&self, mut node_display: impl FnMut(&V) -> String) -> String {
        let mut output = String::new();
        let _ = self.draw_fmt(&mut output, &mut node_display);
        output
    }

    /// Writes the tree as a Graphviz digraph. `node_map` returns the
    /// attribute list of a node, e.g. `label="Ada"`.
    pub fn dot_fmt<W: Write>(&self, writer: &mut W, node_map: &impl Fn(&V) -> String) -> fmt::Result {
        let order = self.all_nodes_with_mates();
        writeln!(writer, "digraph {{")?;

        for &id in &order {
            writeln!(writer, "  {} [{}];", id, node_map(&self[id].data))?;
        }

        for &id in &order {
            let node = &self[id];
            for child in &node.children {
                writeln!(writer, "  {id} -> {child};")?;
            }
            for mate in &node.mates {
                let mirrored = self
                    .get(mate.node)
                    .is_some_and(|m| m.mates.iter().any(|back| back.node == id));
                // a mutual pair is drawn once, from its lower id
                if id < mate.node || !mirrored {
                    writeln!(
                        writer,
                        "  {id} -> {} [dir=none, style=dashed, label=\"{}\"];",
                        mate.node, mate.relationship
                    )?;
                }
            }
        }
        writeln!(writer, "}}")?;
        Ok(())
    }

    pub fn dot(&self, node_map: &impl Fn(&V) -> String) -> String {
        let mut output = String::new();
        let _ = self.dot_fmt(&mut output, node_map);
        output
    }

    pub fn dot_io(
        &self,
        writer: &mut impl std::io::Write,
        node_map: &impl Fn(&V) -> String,
    ) -> Result<(), std::io::Error> {
        writer.write_all(self.dot(node_map).as_bytes())
    }
}

/// A DOT `label` attribute for `text`, with backslashes and quotes escaped.
pub fn dot_label(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("label=\"{escaped}\"")
}

fn write_label<W: Write, V>(
    writer: &mut W,
    node: NodeRef<'_, V>,
    node_display: &mut impl FnMut(&V) -> String,
) -> fmt::Result {
    let inner = node.node();
    write!(
        writer,
        "{} [{:?} h{}]",
        node_display(node.data()),
        inner.position(),
        inner.height()
    )?;
    for (mate, relationship) in node.mates() {
        write!(writer, " + {} (rel {relationship})", node_display(mate.data()))?;
    }
    writeln!(writer)
}

/// Pushes the children of `node` so that the first one is popped next.
fn push_children<'a, V>(
    stack: &mut Vec<(NodeRef<'a, V>, String, bool)>,
    node: NodeRef<'a, V>,
    prefix: &str,
) {
    let children: Vec<_> = node.children().collect();
    let num_children = children.len();
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), i + 1 == num_children));
    }
}

#[cfg(test)]
pub mod test {
    use super::dot_label;
    use crate::tree::{GenealogyTree, RelationshipId};

    fn family() -> GenealogyTree<&'static str> {
        let mut tree = GenealogyTree::new("R");
        let a = tree.add_node("A", tree.root()).unwrap();
        tree.add_node("B", tree.root()).unwrap();
        tree.add_node("C", a).unwrap();
        tree.add_mate("M", RelationshipId(7), a).unwrap();
        tree
    }

    #[test]
    fn draw() {
        let tree = family();
        insta::assert_snapshot!(tree.debug_draw(|v| v.to_string()), @r"
        R [Middle h0]
        ├── A [Middle h1] + M (rel 7)
        │   └── C [Middle h2]
        └── B [Right h1]
        ");
    }

    #[test]
    fn dot() {
        let tree = family();
        insta::assert_snapshot!(tree.dot(&|v| format!("label=\"{v}\"")), @r#"
        digraph {
          0 [label="R"];
          1 [label="A"];
          2 [label="B"];
          4 [label="M"];
          3 [label="C"];
          0 -> 1;
          0 -> 2;
          1 -> 3;
          1 -> 4 [dir=none, style=dashed, label="7"];
        }
        "#);
    }

    #[test]
    fn one_sided_mates_are_still_drawn() {
        let mut tree = family();
        tree.remove_mate(&"A", &"M").unwrap();
        let dot = tree.dot(&|v| format!("label=\"{v}\""));
        // M is no longer reachable, so neither it nor its link appear
        assert!(!dot.contains("label=\"M\""));

        let mut tree = family();
        tree.remove_mate(&"M", &"A").unwrap();
        let dot = tree.dot(&|v| format!("label=\"{v}\""));
        assert!(dot.contains("1 -> 4 [dir=none"));
    }

    #[test]
    fn draws_deep_chains() {
        // every line is indented by its depth, so the output grows quadratically
        const GENERATIONS: usize = 4_000;
        let mut tree = GenealogyTree::new(0usize);
        let mut at = tree.root();
        for i in 1..GENERATIONS {
            at = tree.add_node(i, at).unwrap();
        }

        let drawing = tree.debug_draw(|v| v.to_string());
        let lines: Vec<_> = drawing.lines().collect();
        assert_eq!(lines.len(), GENERATIONS);
        assert_eq!(lines[1], "└── 1 [Right h1]");
        let last = GENERATIONS - 1;
        assert_eq!(
            lines[last],
            format!("{}└── {last} [Right h{last}]", " ".repeat(4 * (last - 1)))
        );
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(dot_label("Ada"), r#"label="Ada""#);
        assert_eq!(dot_label(r#"say "hi""#), r#"label="say \"hi\"""#);
        assert_eq!(dot_label(r"trailing\"), r#"label="trailing\\""#);
        assert_eq!(dot_label(r#"\""#), r#"label="\\\"""#);
    }

    #[test]
    fn dot_io_matches_dot() {
        let tree = family();
        let mut buffer = Vec::new();
        tree.dot_io(&mut buffer, &|v| v.to_string()).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), tree.dot(&|v| v.to_string()));
    }
}
