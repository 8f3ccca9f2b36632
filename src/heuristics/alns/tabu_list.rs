use std::collections::HashMap;

use crate::graph::VertexId;

/// one forbidden (vertex, colour) pairing and when it was recorded
#[derive(Debug, Clone, Copy)]
pub struct TabuMove {
    /// stable colour id the vertex must stay out of
    pub colour_id: u32,
    /// iteration at which the move was recorded
    pub entry_iteration: u32,
}

/** Short-term memory of the repair moves: after a vertex is re-inserted
into a colour, that pairing is blocked for `tabu_tenure` iterations so a
repair cannot simply undo the destroy that preceded it. Colours are
tracked by stable id, which stays meaningful while classes shift. */
#[derive(Debug, Default)]
pub struct ShortTermMemory {
    moves: HashMap<VertexId, Vec<TabuMove>>,
}

impl ShortTermMemory {
    /// empty memory
    pub fn new() -> Self {
        Self::default()
    }

    /// true iff the vertex is currently blocked from the colour
    pub fn blocks(&self, v: VertexId, colour_id: u32) -> bool {
        self.moves
            .get(&v)
            .is_some_and(|list| list.iter().any(|m| m.colour_id == colour_id))
    }

    /// records a fresh pairing
    pub fn record(&mut self, v: VertexId, colour_id: u32, iteration: u32) {
        self.moves
            .entry(v)
            .or_default()
            .push(TabuMove { colour_id, entry_iteration: iteration });
    }

    /// drops every pairing older than the tenure
    pub fn purge(&mut self, current_iteration: u32, tenure: u32) {
        self.moves.retain(|_, list| {
            list.retain(|m| m.entry_iteration + tenure >= current_iteration);
            !list.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_until_the_tenure_expires() {
        let mut memory = ShortTermMemory::new();
        memory.record(3, 7, 10);
        assert!(memory.blocks(3, 7));
        assert!(!memory.blocks(3, 8));
        memory.purge(15, 5);
        assert!(memory.blocks(3, 7));
        memory.purge(16, 5);
        assert!(!memory.blocks(3, 7));
    }
}
