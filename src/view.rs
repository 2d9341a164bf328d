//! Selection and search state for the visualization.
//!
//! A `ViewState` is a complete snapshot. Every interaction builds a new one
//! from scratch instead of patching the previous state, so a search can never
//! inherit highlights from an earlier selection.

use crate::analysis::SimilarityGraph;
use crate::model::SurveyDetail;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub selected: Option<String>,
    pub query: Option<String>,
    /// Highlighted node ids in graph input order.
    pub highlighted: Vec<String>,
    /// Indices into the graph's edge list that stay at full opacity.
    pub active_links: Vec<usize>,
}

impl ViewState {
    /// Nothing selected, nothing searched, nothing dimmed.
    pub fn reset() -> Self {
        Self::default()
    }

    /// Highlight `id` and its direct neighbors. Unknown ids reset the view.
    pub fn select(graph: &SimilarityGraph, id: &str) -> Self {
        if !graph.contains(id) {
            return Self::reset();
        }

        let mut hit: HashSet<&str> = graph.neighbors(id).into_iter().collect();
        hit.insert(id);

        let active_links = graph
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source == id || e.target == id)
            .map(|(i, _)| i)
            .collect();

        Self {
            selected: Some(id.to_string()),
            query: None,
            highlighted: in_input_order(graph, &hit),
            active_links,
        }
    }

    /// Highlight nodes whose id, question texts or option texts contain
    /// `term` as a whole word, ignoring case. A blank term resets the view.
    pub fn search(
        graph: &SimilarityGraph,
        details: &HashMap<String, SurveyDetail>,
        term: &str,
    ) -> Self {
        let term = term.trim();
        if term.is_empty() {
            return Self::reset();
        }
        let needle = term.to_lowercase();

        let hit: HashSet<&str> = graph
            .nodes()
            .iter()
            .filter(|node| {
                contains_word(&node.id, &needle)
                    || details.get(&node.id).is_some_and(|d| {
                        d.questions.iter().any(|q| {
                            contains_word(&q.text, &needle)
                                || q.responses.iter().any(|r| contains_word(&r.option, &needle))
                        })
                    })
            })
            .map(|node| node.id.as_str())
            .collect();

        let active_links = graph
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, e)| hit.contains(e.source.as_str()) || hit.contains(e.target.as_str()))
            .map(|(i, _)| i)
            .collect();

        Self {
            selected: None,
            query: Some(term.to_string()),
            highlighted: in_input_order(graph, &hit),
            active_links,
        }
    }

    /// Whether the page should fade everything not highlighted.
    pub fn is_filtering(&self) -> bool {
        self.selected.is_some() || self.query.is_some()
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.iter().any(|h| h == id)
    }

    pub fn is_link_dimmed(&self, index: usize) -> bool {
        self.is_filtering() && !self.active_links.contains(&index)
    }
}

fn in_input_order(graph: &SimilarityGraph, hit: &HashSet<&str>) -> Vec<String> {
    graph
        .nodes()
        .iter()
        .filter(|n| hit.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect()
}

/// `needle` must already be lowercase.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}
