use crate::analysis::SimilarityGraph;
use crate::model::{Cluster, ClusterLabels, Partition, PrecomputedCluster};
use std::collections::{HashMap, HashSet};

/// Words that never make a useful cluster label. Tokens of three characters
/// or fewer are dropped before this list is consulted.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "what", "which", "when", "where", "whom", "whose", "does", "have", "your", "with", "that",
    "this", "these", "those", "from", "about", "would", "should", "could", "there", "their",
    "they", "them", "been", "being", "were", "will", "into", "more", "most", "much", "many",
    "some", "than", "then", "also", "just", "over", "very", "such", "each", "other", "like",
    "following", "currently", "usually", "often", "ever", "think", "feel", "prefer", "choose",
    "plan", "planning", "people", "respondents",
];

/// Built-in topic dictionaries for financial survey data.
pub const DEFAULT_DOMAINS: &[(&str, &[&str])] = &[
    (
        "Investment",
        &[
            "investment", "investments", "invest", "investing", "stock", "stocks", "fund",
            "funds", "mutual", "portfolio", "shares", "equity", "crypto", "gold",
        ],
    ),
    (
        "Banking",
        &[
            "bank", "banks", "banking", "account", "accounts", "savings", "deposit", "deposits",
            "credit", "card", "cards", "payment", "payments", "digital", "wallet",
        ],
    ),
    (
        "Lending",
        &[
            "loan", "loans", "mortgage", "debt", "interest", "borrow", "borrowing", "lender",
            "lending",
        ],
    ),
    (
        "Housing",
        &[
            "housing", "property", "home", "house", "rent", "rental", "estate", "apartment",
        ],
    ),
    (
        "Budgeting",
        &[
            "budget", "budgeting", "expense", "expenses", "income", "spending", "salary",
            "money", "finance", "financial",
        ],
    ),
    (
        "Insurance",
        &["insurance", "insured", "policy", "premium", "coverage", "claim"],
    ),
];

/// A named topic category with a fixed keyword list.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Domain {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn defaults() -> Vec<Domain> {
        DEFAULT_DOMAINS
            .iter()
            .map(|(name, keywords)| Domain::new(*name, keywords.iter().copied()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelOptions {
    /// Clusters smaller than this get no label.
    pub min_cluster_size: usize,
    pub max_words: usize,
    /// A further word is appended only while the label stays shorter than this.
    pub max_label_chars: usize,
    /// Multiplier for tokens found in any domain dictionary.
    pub domain_weight: f64,
    pub stop_words: Vec<String>,
    pub domains: Vec<Domain>,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            min_cluster_size: 3,
            max_words: 2,
            max_label_chars: 12,
            domain_weight: 3.0,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            domains: Domain::defaults(),
        }
    }
}

/// Token frequency in first-encounter order.
struct TokenCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl TokenCounts {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn add(&mut self, token: String) {
        match self.counts.get_mut(&token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.clone(), 1);
                self.order.push(token);
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order
            .iter()
            .map(|t| (t.as_str(), self.counts.get(t).copied().unwrap_or(0)))
    }
}

pub struct ClusterLabeler {
    options: LabelOptions,
    stop_words: HashSet<String>,
    domain_tokens: HashSet<String>,
}

impl ClusterLabeler {
    pub fn new(options: LabelOptions) -> Self {
        let stop_words = options.stop_words.iter().map(|w| w.to_lowercase()).collect();
        let domain_tokens = options
            .domains
            .iter()
            .flat_map(|d| d.keywords.iter().map(|k| k.to_lowercase()))
            .collect();

        Self {
            options,
            stop_words,
            domain_tokens,
        }
    }

    /// Label every cluster of the partition that is large enough.
    pub fn label_all(
        &self,
        partition: &Partition,
        graph: &SimilarityGraph,
        precomputed: &[PrecomputedCluster],
    ) -> ClusterLabels {
        let mut labels = ClusterLabels::new();
        for cluster in partition.iter() {
            if let Some(label) = self.label(cluster, graph, precomputed) {
                labels.insert(cluster.id.clone(), label);
            }
        }
        labels
    }

    /// Short display label for `cluster`, or `None` when it is too small.
    pub fn label(
        &self,
        cluster: &Cluster,
        graph: &SimilarityGraph,
        precomputed: &[PrecomputedCluster],
    ) -> Option<String> {
        if cluster.size() < self.options.min_cluster_size {
            return None;
        }

        if let Some(label) = passthrough(cluster, graph, precomputed) {
            return Some(label);
        }

        let counts = self.token_counts(cluster, graph);

        let mut qualifying: Vec<(usize, &str, f64)> = counts
            .iter()
            .enumerate()
            .filter(|(_, (_, count))| *count >= 2)
            .map(|(order, (token, count))| (order, token, self.weighted(token, count)))
            .collect();
        qualifying.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        if let Some((_, first, _)) = qualifying.first() {
            let mut label = capitalize(first);
            let extra = self.options.max_words.saturating_sub(1);
            for (_, next, _) in qualifying.iter().skip(1).take(extra) {
                let width = label.chars().count() + next.chars().count();
                if width >= self.options.max_label_chars {
                    break;
                }
                label.push(' ');
                label.push_str(&capitalize(next));
            }
            return Some(label);
        }

        if let Some(domain) = self.dominant_domain(&counts) {
            return Some(domain.to_string());
        }

        Some(format!("Cluster {}", cluster.size()))
    }

    /// Keywords when the node has them; otherwise the words of its id, topic
    /// and survey questions, each distinct text counted once per node.
    fn token_counts(&self, cluster: &Cluster, graph: &SimilarityGraph) -> TokenCounts {
        let mut counts = TokenCounts::new();

        for member in &cluster.members {
            let Some(node) = graph.node(member) else {
                continue;
            };

            if !node.keywords.is_empty() {
                for keyword in &node.keywords {
                    let keyword = keyword.trim().to_lowercase();
                    if !keyword.is_empty() {
                        counts.add(keyword);
                    }
                }
                continue;
            }

            let mut texts: Vec<&str> = vec![node.id.as_str()];
            for text in node.topic.iter().chain(&node.questions) {
                if !texts.contains(&text.as_str()) {
                    texts.push(text);
                }
            }
            for text in texts {
                for token in self.tokenize(text) {
                    counts.add(token);
                }
            }
        }

        counts
    }

    /// Lowercase words longer than three characters, minus stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() > 3 && !self.stop_words.contains(w))
            .collect()
    }

    fn weighted(&self, token: &str, count: usize) -> f64 {
        if self.domain_tokens.contains(token) {
            count as f64 * self.options.domain_weight
        } else {
            count as f64
        }
    }

    /// The domain with the strictly highest number of token hits, if any.
    fn dominant_domain(&self, counts: &TokenCounts) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        let mut tied = false;

        for domain in &self.options.domains {
            let hits: usize = counts
                .iter()
                .filter(|(token, _)| domain.keywords.iter().any(|k| k.eq_ignore_ascii_case(token)))
                .map(|(_, count)| count)
                .sum();

            match best {
                Some((_, top)) if hits < top => {}
                Some((_, top)) if hits == top => tied = true,
                _ => {
                    best = Some((domain.name.as_str(), hits));
                    tied = false;
                }
            }
        }

        match best {
            Some((name, hits)) if hits > 0 && !tied => Some(name),
            _ => None,
        }
    }
}

/// Most common source `cluster_id` among the members, resolved to its
/// precomputed label when one exists.
fn passthrough(
    cluster: &Cluster,
    graph: &SimilarityGraph,
    precomputed: &[PrecomputedCluster],
) -> Option<String> {
    let mut counts = TokenCounts::new();
    for member in &cluster.members {
        if let Some(source_id) = graph.node(member).and_then(|n| n.cluster_id.clone()) {
            counts.add(source_id);
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (source_id, count) in counts.iter() {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((source_id, count));
        }
    }

    let (source_id, _) = best?;
    let label = precomputed
        .iter()
        .find(|c| c.id == source_id)
        .map(|c| c.label.clone())
        .unwrap_or_else(|| source_id.to_string());
    Some(label)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}
