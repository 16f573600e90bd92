use lazy_static::lazy_static;
use mp_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Word polarity weights in AFINN style: integers in -5..=5.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    weights: HashMap<String, i32>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled table: a general-purpose AFINN subset plus market vocabulary.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a (&'a str, i32)>) -> Self {
        let mut lexicon = Self::new();
        for (word, weight) in pairs {
            lexicon.insert(*word, *weight);
        }
        lexicon
    }

    /// Parses the AFINN text format: one `word<TAB>weight` entry per line.
    /// Blank lines and lines starting with `#` are skipped, as are
    /// multi-word phrases, which no tokenizer ever yields.
    pub fn from_afinn(text: &str) -> Result<Self> {
        let mut lexicon = Self::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, weight) = line
                .rsplit_once(|c: char| c.is_whitespace())
                .ok_or_else(|| Error::Lexicon(format!("line {}: expected `word<TAB>weight`", number + 1)))?;
            let weight = weight
                .trim()
                .parse::<i32>()
                .map_err(|e| Error::Lexicon(format!("line {}: invalid weight {:?}: {}", number + 1, weight, e)))?;
            let word = word.trim();
            if word.contains(char::is_whitespace) {
                debug!("Skipping multi-word lexicon entry {:?} on line {}", word, number + 1);
                continue;
            }
            lexicon.insert(word, weight);
        }
        Ok(lexicon)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let lexicon = Self::from_afinn(&text)?;
        if lexicon.is_empty() {
            return Err(Error::Lexicon(format!("{} contains no entries", path.as_ref().display())));
        }
        Ok(lexicon)
    }

    pub fn insert(&mut self, word: &str, weight: i32) {
        self.weights.insert(word.to_lowercase(), weight);
    }

    pub fn weight(&self, word: &str) -> Option<i32> {
        self.weights.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.weights.iter().map(|(w, v)| (w.as_str(), *v))
    }
}

lazy_static! {
    static ref BUILTIN: Lexicon = Lexicon::from_pairs(BUILTIN_WEIGHTS.iter());
}

const BUILTIN_WEIGHTS: &[(&str, i32)] = &[
    // general
    ("abandon", -2), ("abandoned", -2), ("accomplish", 2), ("accomplished", 2),
    ("achieve", 2), ("achievement", 2), ("admire", 3), ("advantage", 2),
    ("afraid", -2), ("aggressive", -2), ("agree", 1), ("alarm", -2),
    ("alarmed", -2), ("amazing", 4), ("anger", -3), ("angry", -3),
    ("anxious", -2), ("anxiety", -2), ("applaud", 2), ("approve", 2),
    ("approved", 2), ("attack", -1), ("avoid", -1), ("awesome", 4),
    ("bad", -3), ("ban", -2), ("banned", -2), ("bankrupt", -3),
    ("bankruptcy", -3), ("beautiful", 3), ("benefit", 2), ("benefits", 2),
    ("best", 3), ("better", 2), ("blame", -2), ("blocked", -1),
    ("boost", 1), ("boosted", 1), ("boosts", 1), ("breakthrough", 3),
    ("brilliant", 4), ("broken", -1), ("burden", -2), ("calm", 2),
    ("catastrophe", -3), ("catastrophic", -4), ("celebrate", 3), ("chaos", -2),
    ("cheer", 2), ("collapse", -2), ("collapsed", -2), ("confident", 2),
    ("confidence", 2), ("conflict", -2), ("confusion", -2), ("crash", -2),
    ("crashed", -2), ("crashes", -2), ("crisis", -3), ("critical", -2),
    ("criticism", -2), ("cut", -1), ("cuts", -1), ("damage", -3),
    ("damaged", -3), ("danger", -2), ("dangerous", -2), ("dead", -3),
    ("debt", -2), ("decline", -1), ("declined", -1), ("declines", -1),
    ("defeat", -2), ("deficit", -2), ("delay", -1), ("delayed", -1),
    ("depressed", -2), ("depression", -2), ("destroy", -3), ("destroyed", -3),
    ("disappoint", -2), ("disappointed", -2), ("disappointing", -2), ("disaster", -2),
    ("doubt", -1), ("doubts", -1), ("drop", -1), ("dropped", -1),
    ("drops", -1), ("easy", 1), ("effective", 2), ("efficient", 2),
    ("encourage", 2), ("encouraging", 2), ("enjoy", 2), ("excellent", 3),
    ("excited", 3), ("exciting", 3), ("fail", -2), ("failed", -2),
    ("failure", -2), ("fails", -2), ("fall", -1), ("fallen", -1),
    ("falling", -1), ("falls", -1), ("fantastic", 4), ("favorable", 2),
    ("fear", -2), ("fears", -2), ("fearful", -2), ("fell", -1),
    ("fine", 2), ("fired", -2), ("fraud", -4), ("free", 1),
    ("gain", 2), ("gained", 2), ("gains", 2), ("glad", 3),
    ("gloom", -1), ("gloomy", -2), ("good", 3), ("great", 3),
    ("greater", 3), ("greatest", 3), ("grow", 1), ("growing", 1),
    ("growth", 2), ("happy", 3), ("harm", -2), ("healthy", 2),
    ("help", 2), ("hope", 2), ("hopeful", 2), ("hurt", -2),
    ("illegal", -3), ("impressive", 3), ("improve", 2), ("improved", 2),
    ("improvement", 2), ("improves", 2), ("innovative", 2), ("interest", 1),
    ("jeopardy", -2), ("kill", -3), ("lack", -2), ("lawsuit", -2),
    ("lose", -3), ("loses", -3), ("losing", -3), ("loss", -3),
    ("losses", -3), ("lost", -3), ("love", 3), ("lucky", 3),
    ("miss", -2), ("missed", -2), ("mistake", -2), ("negative", -2),
    ("nervous", -2), ("opportunity", 2), ("optimism", 2),
    ("optimistic", 2), ("outstanding", 5), ("panic", -3), ("pessimistic", -2),
    ("poor", -2), ("positive", 2), ("pressure", -1), ("problem", -2),
    ("problems", -2), ("profit", 2), ("profitable", 3), ("profits", 2),
    ("progress", 2), ("promise", 1), ("promising", 2), ("prosperity", 3),
    ("protect", 1), ("protest", -2), ("recession", -2), ("recover", 2),
    ("recovered", 2), ("recovery", 2), ("reject", -1), ("rejected", -1),
    ("relief", 1), ("resign", -1), ("rich", 2), ("risk", -2),
    ("risks", -2), ("risky", -2), ("robust", 2), ("sad", -2),
    ("safe", 1), ("scandal", -3), ("scare", -2), ("scared", -2),
    ("secure", 2), ("shock", -2), ("shocked", -2), ("shortage", -2),
    ("slow", -2), ("slowdown", -2), ("solid", 2), ("stable", 2),
    ("strength", 2), ("strengthen", 2), ("strong", 2), ("stronger", 2),
    ("strongest", 2), ("struggle", -2), ("struggling", -2), ("success", 2),
    ("successful", 3), ("suffer", -2), ("support", 2), ("threat", -2),
    ("threaten", -2), ("threatened", -2), ("trouble", -2), ("uncertain", -1),
    ("uncertainty", -1), ("unemployment", -2), ("upset", -2), ("warn", -2),
    ("warned", -2), ("warning", -3), ("warns", -2), ("weak", -2),
    ("weaker", -2), ("weakness", -2), ("win", 4), ("winner", 4),
    ("wins", 4), ("worried", -3), ("worries", -3), ("worry", -3),
    ("worse", -3), ("worst", -3), ("wrong", -2),
    // markets
    ("bearish", -2), ("beat", 1), ("beats", 1), ("bullish", 2),
    ("climb", 1), ("climbed", 1), ("climbs", 1), ("default", -2),
    ("downgrade", -2), ("downgraded", -2), ("inflation", -1), ("layoff", -2),
    ("layoffs", -2), ("outperform", 2), ("plummet", -3), ("plummeted", -3),
    ("plummets", -3), ("plunge", -2), ("plunged", -2), ("plunges", -2),
    ("rally", 2), ("rallied", 2), ("rallies", 2), ("rebound", 2),
    ("rebounded", 2), ("rebounds", 2), ("rise", 1), ("rises", 1),
    ("rising", 1), ("rose", 1), ("selloff", -2), ("sell-off", -2),
    ("slump", -2), ("slumped", -2), ("slumps", -2), ("soar", 2),
    ("soared", 2), ("soars", 2), ("surge", 2), ("surged", 2),
    ("surges", 2), ("tumble", -2), ("tumbled", -2), ("tumbles", -2),
    ("underperform", -2), ("upgrade", 1), ("upgraded", 1), ("volatile", -1),
    ("volatility", -1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_weights() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.weight("surge"), Some(2));
        assert_eq!(lexicon.weight("plunge"), Some(-2));
        assert_eq!(lexicon.weight("outstanding"), Some(5));
        assert_eq!(lexicon.weight("flat"), None);
        assert!(lexicon.iter().all(|(_, w)| (-5..=5).contains(&w)));
    }

    #[test]
    fn test_from_afinn() {
        let text = "# comment\nabandon\t-2\n\nCool Stuff\t3\nyes 1\n";
        let lexicon = Lexicon::from_afinn(text).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.weight("abandon"), Some(-2));
        assert_eq!(lexicon.weight("cool stuff"), None);
        assert_eq!(lexicon.weight("stuff"), None);
        assert_eq!(lexicon.weight("yes"), Some(1));
    }

    #[test]
    fn test_from_afinn_rejects_bad_weight() {
        let err = Lexicon::from_afinn("good\tthree").unwrap_err();
        assert!(matches!(err, Error::Lexicon(msg) if msg.starts_with("line 1")));

        let err = Lexicon::from_afinn("lonely").unwrap_err();
        assert!(matches!(err, Error::Lexicon(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rally\t4").unwrap();
        writeln!(file, "crash\t-4").unwrap();
        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.weight("rally"), Some(4));
        assert_eq!(lexicon.weight("crash"), Some(-4));

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(Lexicon::load(empty.path()).is_err());
    }
}
