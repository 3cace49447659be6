//! The chains drawn behind the timeline.
//!
//! Every branch is tied to the block of the milestone it grew out of. Block
//! numbers are turned into progress by dividing by [`CURRENT_BLOCK`].

use crate::progress::{BranchEntity, Shimmer, Side};

/// Approximate chain head the timeline runs up to.
pub const CURRENT_BLOCK: u64 = 22_400_000;

/// Fade rate shared by every entry in `CHAIN_BRANCHES`.
pub const BRANCH_FADE_RATE: f64 = 5.0;

pub fn block_to_progress(block: u64) -> f64 {
    block as f64 / CURRENT_BLOCK as f64
}

/// A chain that branches off mainnet at a milestone and keeps running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainBranch {
    pub id: &'static str,
    pub name: &'static str,
    pub start_block: u64,
    pub color: &'static str,
    /// Older or abandoned chains get a lower base opacity.
    pub base_opacity: f64,
    pub shimmer: Shimmer,
    pub side: Side,
    pub milestone: &'static str,
}

impl ChainBranch {
    pub fn start_progress(&self) -> f64 {
        block_to_progress(self.start_block)
    }

    pub fn entity(&self) -> BranchEntity {
        BranchEntity {
            id: self.id,
            activation_point: self.start_progress(),
            base_opacity: self.base_opacity,
            fade_rate: BRANCH_FADE_RATE,
            side: self.side,
            shimmer: self.shimmer,
            merge_point: None,
        }
    }
}

pub const CHAIN_BRANCHES: [ChainBranch; 9] = [
    // Historical forks
    ChainBranch {
        id: "etc",
        name: "Ethereum Classic",
        start_block: 1_920_000,
        color: "#34D399",
        base_opacity: 0.12,
        shimmer: Shimmer::Slow,
        side: Side::Left,
        milestone: "DAO Fork - Chain split",
    },
    // Abandoned scaling attempts
    ChainBranch {
        id: "plasma",
        name: "Plasma",
        start_block: 4_370_000,
        color: "#666666",
        base_opacity: 0.08,
        shimmer: Shimmer::Slow,
        side: Side::Right,
        milestone: "Plasma Whitepaper",
    },
    ChainBranch {
        id: "raiden",
        name: "Raiden",
        start_block: 4_700_000,
        color: "#555555",
        base_opacity: 0.06,
        shimmer: Shimmer::Slow,
        side: Side::Left,
        milestone: "Raiden Network",
    },
    // Active L2s
    ChainBranch {
        id: "optimism",
        name: "OP Mainnet",
        start_block: 12_686_786,
        color: "#FF0420",
        base_opacity: 0.35,
        shimmer: Shimmer::Medium,
        side: Side::Left,
        milestone: "Optimism Mainnet Alpha",
    },
    ChainBranch {
        id: "arbitrum",
        name: "Arbitrum",
        start_block: 13_133_428,
        color: "#28A0F0",
        base_opacity: 0.4,
        shimmer: Shimmer::Fast,
        side: Side::Right,
        milestone: "Arbitrum One Launch",
    },
    ChainBranch {
        id: "zksync",
        name: "zkSync Era",
        start_block: 16_890_000,
        color: "#4E529A",
        base_opacity: 0.3,
        shimmer: Shimmer::Pulse,
        side: Side::Left,
        milestone: "zkSync Era Launch",
    },
    ChainBranch {
        id: "linea",
        name: "Linea",
        start_block: 17_720_000,
        color: "#61DFFF",
        base_opacity: 0.25,
        shimmer: Shimmer::Wave,
        side: Side::Right,
        milestone: "Linea Launch",
    },
    ChainBranch {
        id: "base",
        name: "Base",
        start_block: 17_880_000,
        color: "#0052FF",
        base_opacity: 0.45,
        shimmer: Shimmer::Fast,
        side: Side::Left,
        milestone: "Base Mainnet Launch",
    },
    ChainBranch {
        id: "scroll",
        name: "Scroll",
        start_block: 18_400_000,
        color: "#FFEEDA",
        base_opacity: 0.25,
        shimmer: Shimmer::Wave,
        side: Side::Right,
        milestone: "Scroll Launch",
    },
];

/// A chain that runs beside mainnet and later merges back into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergingChain {
    pub id: &'static str,
    pub name: &'static str,
    pub start_block: u64,
    pub merge_block: u64,
    pub color: &'static str,
    pub base_opacity: f64,
    pub fade_rate: f64,
    /// Horizontal distance from the main line, in pixels.
    pub lateral_offset_px: f64,
}

impl MergingChain {
    pub fn entity(&self) -> BranchEntity {
        BranchEntity {
            id: self.id,
            activation_point: block_to_progress(self.start_block),
            base_opacity: self.base_opacity,
            fade_rate: self.fade_rate,
            side: Side::Right,
            shimmer: Shimmer::Medium,
            merge_point: Some(block_to_progress(self.merge_block)),
        }
    }
}

pub const BEACON_CHAIN: MergingChain = MergingChain {
    id: "beacon",
    name: "Beacon Chain",
    start_block: 11_052_984,
    merge_block: 15_537_394,
    color: "#FF6B35",
    base_opacity: 0.55,
    fade_rate: 3.0,
    lateral_offset_px: 40.0,
};

/// A hard fork: the old chain curves off the main line and fades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardFork {
    pub id: &'static str,
    pub name: &'static str,
    pub block: u64,
}

// The DAO fork lives in CHAIN_BRANCHES (ETC survived) and The Merge is the
// Beacon Chain, so neither appears here.
pub const HARD_FORKS: [HardFork; 11] = [
    HardFork { id: "homestead", name: "Homestead", block: 1_150_000 },
    HardFork { id: "byzantium", name: "Byzantium", block: 4_370_000 },
    HardFork { id: "constantinople", name: "Constantinople", block: 7_280_000 },
    HardFork { id: "istanbul", name: "Istanbul", block: 9_069_000 },
    HardFork { id: "muir-glacier", name: "Muir Glacier", block: 9_200_000 },
    HardFork { id: "berlin", name: "Berlin", block: 12_244_000 },
    HardFork { id: "london", name: "London", block: 12_965_000 },
    HardFork { id: "arrow-glacier", name: "Arrow Glacier", block: 13_773_000 },
    HardFork { id: "gray-glacier", name: "Gray Glacier", block: 15_050_000 },
    HardFork { id: "shapella", name: "Shapella", block: 17_034_870 },
    HardFork { id: "dencun", name: "Dencun", block: 19_426_587 },
];

/// A glowing dot on the main line marking a special block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilestoneGlow {
    pub id: &'static str,
    pub block: u64,
    pub color: &'static str,
    pub size_px: f64,
}

pub const MILESTONE_GLOWS: [MilestoneGlow; 3] = [
    MilestoneGlow { id: "etc-split", block: 1_920_000, color: "#34D399", size_px: 4.0 },
    MilestoneGlow { id: "the-merge", block: 15_537_394, color: "#00D395", size_px: 12.0 },
    MilestoneGlow { id: "dencun-blobs", block: 19_426_587, color: "#06B6D4", size_px: 8.0 },
];

/// All entities fed through the progress mapper: every L2 branch plus the Beacon Chain.
pub fn branch_entities() -> Vec<BranchEntity> {
    CHAIN_BRANCHES
        .iter()
        .map(ChainBranch::entity)
        .chain(std::iter::once(BEACON_CHAIN.entity()))
        .collect()
}
