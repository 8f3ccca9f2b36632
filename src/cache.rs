use std::fs;
use std::path::{Path, PathBuf};

use bit_set::BitSet;

use crate::graph::Graph;
use crate::stable_set::{StableSet, StableSetCollection};

/// the three files one cache revolves around
#[derive(Debug, Clone, Copy)]
struct CacheFiles {
    index: &'static str,
    tmp: &'static str,
    bak: &'static str,
}

/// best-known solutions, updated after every solver run
const BKS: CacheFiles = CacheFiles { index: "bks.csv", tmp: "tmpbks.csv", bak: "bks.bak" };

/// best greedy colourings, consulted before re-running the greedy
const INIT: CacheFiles = CacheFiles { index: "init.csv", tmp: "tmpinit.csv", bak: "init.bak" };

/** On-disk cache of colourings, one record per instance:

```text
<instance path>;<v>,<v>,...;<v>,<v>,...
```

Records are keyed by the instance file's basename. An update replaces a
record only with a strictly smaller colouring, writes the whole index to
a temp file, moves the previous index to the `.bak` file and renames the
temp file into place. Sets that are no longer stable under the current
graph (a stale record) are dropped on load. */
#[derive(Debug)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    /// cache rooted in the working directory, like the solver binary uses
    pub fn in_working_dir() -> Self {
        Self { dir: PathBuf::from(".") }
    }

    /// cache rooted elsewhere; used by tests
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// loads the best-known columns recorded for this instance
    pub fn bks_load(&self, g: &Graph) -> StableSetCollection {
        self.load(BKS, g)
    }

    /// records a best-known colouring if it beats the stored one
    pub fn bks_store(&self, pool: &[StableSet], g: &Graph) {
        self.store(BKS, pool, g);
    }

    /// loads the cached greedy colouring for this instance
    pub fn init_load(&self, g: &Graph) -> StableSetCollection {
        self.load(INIT, g)
    }

    /// records a greedy colouring if it beats the stored one
    pub fn init_store(&self, pool: &[StableSet], g: &Graph) {
        self.store(INIT, pool, g);
    }

    fn load(&self, files: CacheFiles, g: &Graph) -> StableSetCollection {
        let Ok(text) = fs::read_to_string(self.dir.join(files.index)) else {
            return Vec::new();
        };
        for line in text.lines() {
            let mut tokens = line.split(';');
            let Some(key) = tokens.next() else { continue };
            if !same_basename(key, &g.data_filename) {
                continue;
            }
            let mut columns = StableSetCollection::new();
            for record in tokens {
                let ids: BitSet = record
                    .split(',')
                    .filter_map(|tok| tok.trim().parse::<usize>().ok())
                    .collect();
                if ids.is_empty() || !g.is_stable_set(&ids) {
                    continue;
                }
                let set = StableSet::new(g, ids.iter());
                if !columns.contains(&set) {
                    columns.push(set);
                }
            }
            return columns;
        }
        Vec::new()
    }

    fn store(&self, files: CacheFiles, pool: &[StableSet], g: &Graph) {
        let index = self.dir.join(files.index);
        let old = fs::read_to_string(&index).unwrap_or_default();

        let mut out = String::new();
        let mut updated = false;
        for line in old.lines() {
            if !updated {
                let key = line.split(';').next().unwrap_or("");
                if same_basename(key, &g.data_filename) {
                    let existing = line.split(';').count().saturating_sub(1);
                    if existing > pool.len() {
                        out += &record_line(pool, g);
                    } else {
                        out += line;
                    }
                    out.push('\n');
                    updated = true;
                    continue;
                }
            }
            out += line;
            out.push('\n');
        }
        if !updated {
            out += &record_line(pool, g);
            out.push('\n');
        }

        let tmp = self.dir.join(files.tmp);
        let bak = self.dir.join(files.bak);
        if fs::write(&tmp, out).is_err() {
            return;
        }
        let _ = fs::remove_file(&bak);
        if index.exists() {
            let _ = fs::rename(&index, &bak);
        }
        let _ = fs::rename(&tmp, &index);
    }
}

/// one semicolon-separated record
fn record_line(pool: &[StableSet], g: &Graph) -> String {
    let mut line = g.data_filename.clone();
    for set in pool {
        line.push(';');
        let ids: Vec<String> = set.vertices().iter().map(|v| v.to_string()).collect();
        line += &ids.join(",");
    }
    line
}

/// records are matched on the instance file's basename only
fn same_basename(a: &str, b: &str) -> bool {
    let name = |s: &str| Path::new(s).file_name().map(|n| n.to_owned());
    name(a).is_some() && name(a) == name(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let stamp =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let dir = std::env::temp_dir().join(format!("sgcp-cache-{}-{}-{}", tag, std::process::id(), stamp));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn instance() -> Graph {
        Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "insts/some.sgcp")
            .unwrap()
    }

    #[test]
    fn round_trips_the_stored_sets() {
        let g = instance();
        let cache = Cache::in_dir(scratch_dir("roundtrip"));
        let pool = vec![StableSet::new(&g, [0, 3]), StableSet::new(&g, [4])];
        cache.bks_store(&pool, &g);
        let loaded = cache.bks_load(&g);
        assert_eq!(loaded.len(), pool.len());
        for set in &pool {
            assert!(loaded.contains(set));
        }
        assert!(cache.dir.join("bks.csv").exists());
    }

    #[test]
    fn only_strictly_smaller_colourings_replace_a_record() {
        let g = instance();
        let cache = Cache::in_dir(scratch_dir("replace"));
        let two = vec![StableSet::new(&g, [0, 3]), StableSet::new(&g, [4])];
        let three =
            vec![StableSet::new(&g, [0]), StableSet::new(&g, [2]), StableSet::new(&g, [4])];
        cache.bks_store(&three, &g);
        cache.bks_store(&two, &g);
        assert_eq!(cache.bks_load(&g).len(), 2);
        // a worse colouring does not overwrite the stored one
        cache.bks_store(&three, &g);
        assert_eq!(cache.bks_load(&g).len(), 2);
    }

    #[test]
    fn records_are_keyed_by_basename() {
        let g = instance();
        let cache = Cache::in_dir(scratch_dir("basename"));
        cache.bks_store(&[StableSet::new(&g, [0, 3])], &g);
        let mut moved = instance();
        moved.data_filename = "elsewhere/some.sgcp".to_string();
        assert_eq!(cache.bks_load(&moved).len(), 1);
        let mut other = instance();
        other.data_filename = "insts/other.sgcp".to_string();
        assert!(cache.bks_load(&other).is_empty());
    }

    #[test]
    fn stale_records_are_dropped_on_load() {
        let g = instance();
        let cache = Cache::in_dir(scratch_dir("stale"));
        fs::write(
            cache.dir.join("bks.csv"),
            // 0 and 2 are adjacent: not a stable set of this instance
            "insts/some.sgcp;0,2;1,3\n",
        )
        .unwrap();
        let loaded = cache.bks_load(&g);
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].has_vertex(1) && loaded[0].has_vertex(3));
    }

    #[test]
    fn init_cache_lives_in_its_own_files() {
        let g = instance();
        let cache = Cache::in_dir(scratch_dir("init"));
        cache.init_store(&[StableSet::new(&g, [0, 3]), StableSet::new(&g, [4])], &g);
        assert!(cache.bks_load(&g).is_empty());
        assert_eq!(cache.init_load(&g).len(), 2);
    }
}
