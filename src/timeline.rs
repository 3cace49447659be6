//! Timeline document: eras, entries and upcoming upgrades.
//!
//! The document is plain JSON (camelCase keys) so the same file feeds both the
//! web page and the CLI.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    HardFork,
    Eip,
    Research,
    Milestone,
    Scaling,
    Controversy,
    Application,
}

impl NodeType {
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::HardFork => "Hard Fork",
            NodeType::Eip => "EIP",
            NodeType::Research => "Research",
            NodeType::Milestone => "Milestone",
            NodeType::Scaling => "Scaling",
            NodeType::Controversy => "Debate",
            NodeType::Application => "Application",
        }
    }

    /// Events that spawn a new line in the background.
    pub fn spawns_line(&self) -> bool {
        matches!(self, NodeType::HardFork | NodeType::Scaling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Major,
    #[default]
    Minor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraInfo {
    pub id: String,
    pub name: String,
    pub years: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNode {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub era: String,
    pub summary: String,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub related_eips: Vec<u32>,
    #[serde(default)]
    pub importance: Importance,
}

impl TimelineNode {
    pub fn formatted_date(&self) -> String {
        format_date(self.date)
    }

    pub fn block_label(&self) -> Option<String> {
        self.block_number.map(format_block)
    }

    pub fn eip_labels(&self) -> Vec<String> {
        self.related_eips.iter().map(|eip| format!("EIP-{}", eip)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeStatus {
    Planning,
    Testing,
    Scheduled,
}

impl UpgradeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeStatus::Planning => "Planning",
            UpgradeStatus::Testing => "Testing",
            UpgradeStatus::Scheduled => "Scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLink {
    pub label: String,
    pub url: String,
}

/// A planned upgrade: "the history that hasn't happened yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingUpgrade {
    pub id: String,
    pub name: String,
    pub expected_date: String,
    pub description: String,
    pub status: UpgradeStatus,
    #[serde(default)]
    pub links: Vec<UpgradeLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CardSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPlacement {
    Top,
    Bottom,
}

/// A node together with where it sits on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry<'a> {
    pub node: &'a TimelineNode,
    /// Position within its era.
    pub index: usize,
    pub card_side: CardSide,
    pub marker: MarkerPlacement,
    pub large_marker: bool,
}

impl<'a> TimelineEntry<'a> {
    pub fn new(node: &'a TimelineNode, index: usize) -> Self {
        Self {
            node,
            index,
            card_side: if index % 2 == 0 { CardSide::Left } else { CardSide::Right },
            marker: if node.node_type.spawns_line() {
                MarkerPlacement::Bottom
            } else {
                MarkerPlacement::Top
            },
            large_marker: node.importance == Importance::Major,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EraSection<'a> {
    pub era: &'a EraInfo,
    pub entries: Vec<TimelineEntry<'a>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    pub eras: Vec<EraInfo>,
    pub nodes: Vec<TimelineNode>,
    #[serde(default)]
    pub upcoming: Vec<UpcomingUpgrade>,
}

impl TimelineDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: TimelineDocument =
            serde_json::from_str(json).context("Failed to parse timeline document")?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read timeline {:?}", path))?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> Result<()> {
        for node in &self.nodes {
            if self.era(&node.era).is_none() {
                anyhow::bail!("Node '{}' refers to unknown era '{}'", node.id, node.era);
            }
        }
        Ok(())
    }

    pub fn era(&self, id: &str) -> Option<&EraInfo> {
        self.eras.iter().find(|era| era.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&TimelineNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes grouped by era. Eras and the nodes inside each era keep the
    /// order they have in the document. Eras without nodes are left out.
    pub fn sections(&self) -> Vec<EraSection<'_>> {
        self.eras
            .iter()
            .filter_map(|era| {
                let nodes: Vec<&TimelineNode> =
                    self.nodes.iter().filter(|node| node.era == era.id).collect();
                if nodes.is_empty() {
                    return None;
                }
                Some(EraSection {
                    era,
                    entries: nodes
                        .into_iter()
                        .enumerate()
                        .map(|(index, node)| TimelineEntry::new(node, index))
                        .collect(),
                })
            })
            .collect()
    }
}

/// `1920000` -> `#1,920,000`
pub fn format_block(block: u64) -> String {
    let digits = block.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('#');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `2016-07-20` -> `July 20, 2016`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
