//! Echo fusion: co-located echoes merge into one scoring event

use std::collections::BTreeMap;

use super::entity::{Echo, EntityKind, OrbKind};
use super::events::{Cue, EntityEvent, GameEvent};
use super::grid::{GridPos, manhattan};
use super::state::GameState;

/// Orbs within this Manhattan distance of a fusion turn gold
pub const FUSION_RADIUS: i32 = 2;

/// Group echo indices by cell, keeping only groups of two or more.
/// Groups come out in cell order; indices within a group ascend.
pub fn fusion_groups(echoes: &[Echo]) -> Vec<(GridPos, Vec<usize>)> {
    let mut by_cell: BTreeMap<GridPos, Vec<usize>> = BTreeMap::new();
    for (i, e) in echoes.iter().enumerate() {
        by_cell.entry(e.pos).or_default().push(i);
    }
    by_cell
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .collect()
}

/// Fuse every co-located group once. Returns the number of groups fused.
pub fn resolve_fusions(state: &mut GameState) -> usize {
    let groups = fusion_groups(&state.echoes);
    if groups.is_empty() {
        return 0;
    }

    let window = state.config.multiplier_window;
    let mut doomed = vec![false; state.echoes.len()];
    for (at, members) in &groups {
        let upgrades: Vec<GridPos> = state
            .orbs
            .iter()
            .filter(|(p, kind)| **kind == OrbKind::White && manhattan(**p, *at) <= FUSION_RADIUS)
            .map(|(p, _)| *p)
            .collect();
        for p in upgrades {
            state.orbs.insert(p, OrbKind::Gold);
            state.push_event(EntityEvent::OrbUpgraded { at: p });
        }

        state.score.award_fusion(state.tick, window);
        state.push_event(GameEvent::Fused {
            at: *at,
            echoes: members.len(),
        });
        state.push_event(Cue::EchoFuse);
        log::debug!("{} echoes fused at ({}, {})", members.len(), at.x, at.y);

        for &i in members {
            doomed[i] = true;
        }
    }

    let mut index = 0;
    let mut removed = Vec::new();
    state.echoes.retain(|e| {
        let keep = !doomed[index];
        index += 1;
        if !keep {
            removed.push(e.id);
        }
        keep
    });
    for id in removed {
        state.push_event(EntityEvent::Despawned {
            id,
            kind: EntityKind::Echo,
        });
    }
    groups.len()
}
