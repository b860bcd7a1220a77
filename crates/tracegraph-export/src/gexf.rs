//! GEXF 1.2 output for graph visualization tools.
//!
//! Compound node attributes (arguments, results) are flattened to JSON
//! strings, since GEXF attribute values are scalar.

use tracegraph_core::graph::ProvenanceGraph;
use tracegraph_core::node::GraphNode;

/// GEXF formatter for a built provenance graph.
pub struct GexfWriter;

impl GexfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the whole graph as a GEXF document.
    pub fn write(&self, graph: &ProvenanceGraph) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<gexf xmlns=\"http://gexf.net/1.2\" version=\"1.2\">\n");
        xml.push_str("  <graph defaultedgetype=\"directed\" mode=\"static\">\n");
        xml.push_str("    <attributes class=\"node\">\n");
        xml.push_str("      <attribute id=\"0\" title=\"kind\" type=\"string\"/>\n");
        xml.push_str("      <attribute id=\"1\" title=\"action_name\" type=\"string\"/>\n");
        xml.push_str("      <attribute id=\"2\" title=\"call_index\" type=\"integer\"/>\n");
        xml.push_str("      <attribute id=\"3\" title=\"arguments\" type=\"string\"/>\n");
        xml.push_str("      <attribute id=\"4\" title=\"result\" type=\"string\"/>\n");
        xml.push_str("    </attributes>\n");
        xml.push_str("    <attributes class=\"edge\">\n");
        xml.push_str("      <attribute id=\"0\" title=\"label\" type=\"string\"/>\n");
        xml.push_str("    </attributes>\n");

        xml.push_str("    <nodes>\n");
        let mut call_index = 0usize;
        for (_, node) in graph.nodes() {
            let id = escape_xml(node.id_str());
            let label = match node {
                GraphNode::Origin(origin) => {
                    escape_xml(origin.request_text.as_deref().unwrap_or("origin"))
                }
                GraphNode::Action(action) => escape_xml(&action.action_name),
                GraphNode::Sink { kind } => escape_xml(&kind.to_string()),
            };
            xml.push_str(&format!("      <node id=\"{id}\" label=\"{label}\">\n"));
            xml.push_str("        <attvalues>\n");
            xml.push_str(&format!(
                "          <attvalue for=\"0\" value=\"{}\"/>\n",
                node.kind()
            ));
            if let GraphNode::Action(action) = node {
                call_index += 1;
                xml.push_str(&format!(
                    "          <attvalue for=\"1\" value=\"{}\"/>\n",
                    escape_xml(&action.action_name)
                ));
                xml.push_str(&format!(
                    "          <attvalue for=\"2\" value=\"{call_index}\"/>\n"
                ));
                let arguments =
                    serde_json::to_string(&action.arguments).unwrap_or_else(|_| "{}".to_owned());
                xml.push_str(&format!(
                    "          <attvalue for=\"3\" value=\"{}\"/>\n",
                    escape_xml(&arguments)
                ));
                xml.push_str(&format!(
                    "          <attvalue for=\"4\" value=\"{}\"/>\n",
                    escape_xml(&action.result.to_string())
                ));
            }
            xml.push_str("        </attvalues>\n");
            xml.push_str("      </node>\n");
        }
        xml.push_str("    </nodes>\n");

        xml.push_str("    <edges>\n");
        for (edge_index, (from, to, label)) in graph.edges().enumerate() {
            let source = graph
                .node(from)
                .expect("edge endpoints resolve")
                .id_str();
            let target = graph.node(to).expect("edge endpoints resolve").id_str();
            xml.push_str(&format!(
                "      <edge id=\"{edge_index}\" source=\"{}\" target=\"{}\">\n",
                escape_xml(source),
                escape_xml(target)
            ));
            xml.push_str("        <attvalues>\n");
            xml.push_str(&format!(
                "          <attvalue for=\"0\" value=\"{}\"/>\n",
                escape_xml(&label.to_string())
            ));
            xml.push_str("        </attvalues>\n");
            xml.push_str("      </edge>\n");
        }
        xml.push_str("    </edges>\n");

        xml.push_str("  </graph>\n");
        xml.push_str("</gexf>\n");
        xml
    }
}

impl Default for GexfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
