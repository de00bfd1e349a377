//! Match scoreboard
//!
//! One entry per roster name, created when the name first enters a round and
//! never removed. Scores only grow and carry across rounds for the lifetime
//! of the process.

use serde::{Deserialize, Serialize};

use crate::consts::SCOREBOARD_LINES;

/// A single scoreboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// A ranked scoreboard line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing<'a> {
    /// 1-indexed rank
    pub rank: usize,
    pub name: &'a str,
    pub score: u32,
    pub active: bool,
}

/// Name to score mapping, kept in insertion (roster) order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a zero entry for `name` unless one exists
    pub fn ensure(&mut self, name: &str) {
        if !self.entries.iter().any(|e| e.name == name) {
            self.entries.push(ScoreEntry {
                name: name.to_string(),
                score: 0,
            });
        }
    }

    /// Add one point to `name`, returning the new score
    pub fn award(&mut self, name: &str) -> u32 {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.score += 1;
                entry.score
            }
            None => {
                self.entries.push(ScoreEntry {
                    name: name.to_string(),
                    score: 1,
                });
                1
            }
        }
    }

    pub fn score(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.score)
            .unwrap_or(0)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by score (descending), ties kept in roster order
    pub fn standings<F>(&self, is_active: F) -> Vec<Standing<'_>>
    where
        F: Fn(&str) -> bool,
    {
        let mut ranked: Vec<&ScoreEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
            .into_iter()
            .enumerate()
            .map(|(i, e)| Standing {
                rank: i + 1,
                name: &e.name,
                score: e.score,
                active: is_active(&e.name),
            })
            .collect()
    }

    /// Multi-line display text for the top `limit` standings.
    ///
    /// Eliminated agents stay listed but are suffixed with `(out)`.
    pub fn render<F>(&self, is_active: F, limit: usize) -> String
    where
        F: Fn(&str) -> bool,
    {
        self.standings(is_active)
            .iter()
            .take(limit)
            .map(|s| {
                if s.active {
                    format!("{}. {}: {}", s.rank, s.name, s.score)
                } else {
                    format!("{}. {}: {} (out)", s.rank, s.name, s.score)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HUD text with the default line cap
    pub fn render_hud<F>(&self, is_active: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        self.render(is_active, SCOREBOARD_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_creates_and_increments() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.award("a"), 1);
        assert_eq!(board.award("a"), 2);
        assert_eq!(board.score("a"), 2);
        assert_eq!(board.score("missing"), 0);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut board = ScoreBoard::new();
        board.ensure("a");
        board.award("a");
        board.ensure("a");
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.score("a"), 1);
    }

    #[test]
    fn test_standings_rank_descending_ties_stable() {
        let mut board = ScoreBoard::new();
        for name in ["a", "b", "c"] {
            board.ensure(name);
        }
        board.award("c");
        let standings = board.standings(|_| true);
        let order: Vec<&str> = standings.iter().map(|s| s.name).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[2].rank, 3);
    }

    #[test]
    fn test_render_marks_eliminated_and_caps() {
        let mut board = ScoreBoard::new();
        for i in 0..10 {
            board.ensure(&format!("p{}", i));
        }
        board.award("p3");
        board.award("p3");
        board.award("p5");

        let text = board.render_hud(|name| name != "p5");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), SCOREBOARD_LINES);
        assert_eq!(lines[0], "1. p3: 2");
        assert_eq!(lines[1], "2. p5: 1 (out)");
        assert_eq!(lines[2], "3. p0: 0");
    }
}
