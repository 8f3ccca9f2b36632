/** Acceptance bookkeeping for the `alns-stats` mode: per destroy and per
repair move, how often it was drawn and how often the resulting solution
was accepted. */
#[derive(Debug, Default, Clone)]
pub struct ALNSStats {
    destroy_names: Vec<String>,
    repair_names: Vec<String>,
    destroy_counts: Vec<(u32, u32)>,
    repair_counts: Vec<(u32, u32)>,
}

impl ALNSStats {
    /// stats for a given set of enabled moves
    pub fn new(destroy_names: Vec<String>, repair_names: Vec<String>) -> Self {
        let destroy_counts = vec![(0, 0); destroy_names.len()];
        let repair_counts = vec![(0, 0); repair_names.len()];
        Self { destroy_names, repair_names, destroy_counts, repair_counts }
    }

    /// records one iteration's draw and outcome
    pub fn record(&mut self, destroy: usize, repair: usize, accepted: bool) {
        self.destroy_counts[destroy].0 += 1;
        self.repair_counts[repair].0 += 1;
        if accepted {
            self.destroy_counts[destroy].1 += 1;
            self.repair_counts[repair].1 += 1;
        }
    }

    /// prints the acceptance percentage of every move
    pub fn print_stats(&self) {
        println!("Repair methods:");
        for (name, &(used, accepted)) in self.repair_names.iter().zip(&self.repair_counts) {
            println!("{}, {}", name, percentage(used, accepted));
        }
        println!("Destroy methods:");
        for (name, &(used, accepted)) in self.destroy_names.iter().zip(&self.destroy_counts) {
            println!("{}, {}", name, percentage(used, accepted));
        }
    }
}

fn percentage(used: u32, accepted: u32) -> f32 {
    if used == 0 {
        0.0
    } else {
        100.0 * accepted as f32 / used as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_acceptance_ratio_per_move() {
        let mut stats = ALNSStats::new(vec!["d".into()], vec!["r".into()]);
        stats.record(0, 0, true);
        stats.record(0, 0, false);
        assert_eq!(stats.destroy_counts[0], (2, 1));
        assert_eq!(stats.repair_counts[0], (2, 1));
    }
}
