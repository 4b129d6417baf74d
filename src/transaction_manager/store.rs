use crate::transaction_manager::KeyValue;
use std::collections::{BTreeMap, HashMap};

/// KeyValueStore is the committed state of one transaction manager: the key map and the write log
/// it was built from. The map is always exactly the replay of the log.
#[derive(Debug, Default)]
pub(crate) struct KeyValueStore {
    values: HashMap<String, i64>,
    log: Vec<KeyValue>,
}

impl KeyValueStore {
    pub(crate) fn read(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    pub(crate) fn apply(&mut self, writes: &[KeyValue]) {
        for write in writes {
            self.values.insert(write.key.clone(), write.value);
            self.log.push(write.clone());
        }
    }

    pub(crate) fn log(&self) -> &[KeyValue] {
        &self.log
    }

    /// Throw away everything and rebuild from `log`.
    pub(crate) fn reset_to(&mut self, log: Vec<KeyValue>) {
        self.values.clear();
        self.log.clear();
        self.apply(&log);
    }

    pub(crate) fn snapshot(&self) -> BTreeMap<String, i64> {
        self.values.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// Pick the log a majority agrees on. Logs are grouped by length and the most populated group
/// wins, the longer length breaking ties. Within it, the most common content wins, and the first
/// seen among equally common contents.
pub(crate) fn most_common_log(logs: Vec<Vec<KeyValue>>) -> Option<Vec<KeyValue>> {
    let mut by_length: BTreeMap<usize, Vec<Vec<KeyValue>>> = BTreeMap::new();
    for log in logs {
        by_length.entry(log.len()).or_default().push(log);
    }

    // Iterating lengths in ascending order with `>=` lets the longer length win ties.
    let mut chosen: Option<Vec<Vec<KeyValue>>> = None;
    for (_, group) in by_length {
        let replace = match &chosen {
            None => true,
            Some(best) => group.len() >= best.len(),
        };
        if replace {
            chosen = Some(group);
        }
    }

    let group = chosen?;
    let mut tally: Vec<(Vec<KeyValue>, usize)> = Vec::new();
    for log in group {
        match tally.iter_mut().find(|(seen, _)| *seen == log) {
            Some((_, count)) => *count += 1,
            None => tally.push((log, 1)),
        }
    }

    let mut best: Option<(Vec<KeyValue>, usize)> = None;
    for (log, count) in tally {
        let replace = match &best {
            None => true,
            Some((_, best_count)) => count > *best_count,
        };
        if replace {
            best = Some((log, count));
        }
    }

    best.map(|(log, _)| log)
}
