use serde::Serialize;
use stemma_graph::{render_tree, validate_tree, DependencyGraph};
use stemma_parser::{parse_notation, NotationError, Parser, RuleTable};
use stemma_protocol::Node;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// The structured response sent back to JavaScript
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub forest: Vec<Node>,
    pub edges: Vec<EdgeReport>,
    pub violations: Vec<String>,
    pub stats: StatsReport,
    /// Indented text rendering of the forest
    pub tree: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeReport {
    pub head: String,
    pub dependent: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub passes: usize,
    pub lengths: Vec<usize>,
    pub splices: usize,
    pub fixed_point: bool,
}

/// The engine instance running in the browser
#[wasm_bindgen]
pub struct StemmaEngine {
    parser: Parser,
}

#[wasm_bindgen]
impl StemmaEngine {
    /// `rules` is a compiled rule archive (fetched by JS); without one the
    /// built-in English table is used.
    #[wasm_bindgen(constructor)]
    pub fn new(rules: Option<Vec<u8>>) -> Result<StemmaEngine, JsValue> {
        let table = match rules {
            Some(bytes) => RuleTable::from_archive(&bytes).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => RuleTable::english(),
        };
        Ok(Self {
            parser: Parser::new(table, Default::default()),
        })
    }

    /// Notation -> chunks -> reduced forest -> report
    pub fn analyze(&self, notation: &str, limit: usize) -> Result<JsValue, JsValue> {
        let report = self
            .report(notation, limit)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }
}

impl StemmaEngine {
    pub fn report(&self, notation: &str, limit: usize) -> Result<AnalysisReport, NotationError> {
        let chunks = parse_notation(notation)?;
        let parse = self.parser.parse(chunks, limit);

        let graph = DependencyGraph::from_forest(&parse.forest);
        let edges = graph
            .edges()
            .into_iter()
            .map(|edge| EdgeReport {
                head: graph.word(edge.head).text.clone(),
                dependent: graph.word(edge.dependent).text.clone(),
                label: edge.label.to_string(),
            })
            .collect();

        Ok(AnalysisReport {
            edges,
            violations: validate_tree(&parse.forest).iter().map(ToString::to_string).collect(),
            stats: StatsReport {
                passes: parse.stats.passes,
                lengths: parse.stats.lengths,
                splices: parse.stats.splices,
                fixed_point: parse.stats.fixed_point,
            },
            tree: render_tree(&parse.forest),
            forest: parse.forest,
        })
    }
}
