//! Puzzle catalog
//!
//! Built-in pictures plus up to ten user-added ones. The core only cares
//! about a puzzle's id (tile-order seed), image reference, name and hints.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::MAX_CUSTOM_PUZZLES;
use crate::error::CatalogError;

/// A picture to reveal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleEntry {
    pub id: String,
    pub name: String,
    pub image_ref: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl PuzzleEntry {
    pub fn new(id: &str, name: &str, image_ref: &str, hints: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image_ref: image_ref.to_string(),
            hints: hints.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Hint shown after `step` completes
    ///
    /// Hints recycle when there are more steps than hints.
    pub fn hint_for_step(&self, step: i32) -> Option<&str> {
        if step < 0 || self.hints.is_empty() {
            return None;
        }
        self.hints
            .get(step as usize % self.hints.len())
            .map(String::as_str)
    }
}

struct BuiltinPuzzle {
    id: &'static str,
    name: &'static str,
    image_ref: &'static str,
    hints: &'static [&'static str],
}

const BUILTIN_PUZZLES: &[BuiltinPuzzle] = &[
    BuiltinPuzzle {
        id: "komachi",
        name: "こまち",
        image_ref: "images/komachi.png",
        hints: &["あかい いろが みえるよ！🔴", "でんしゃ かな？ しんかんせん かな？🚄"],
    },
    BuiltinPuzzle {
        id: "hayabusa",
        name: "はやぶさ",
        image_ref: "images/hayabusa.png",
        hints: &["みどりいろ！なにかな？💚", "しんかんせん だ！どの しんかんせん？🚅"],
    },
    BuiltinPuzzle {
        id: "firetruck",
        name: "しょうぼうしゃ",
        image_ref: "images/firetruck.png",
        hints: &["あかくて おおきい！🔴", "おみず を だすよ！なんの くるま？🚒"],
    },
    BuiltinPuzzle {
        id: "panda",
        name: "パンダ",
        image_ref: "images/panda.png",
        hints: &["しろと くろ の どうぶつ だよ！🐾", "ささ を たべるよ！だ〜れだ？🎋"],
    },
    BuiltinPuzzle {
        id: "rabbit",
        name: "うさぎ",
        image_ref: "images/rabbit.png",
        hints: &["ながい みみ が みえる！👂", "ぴょんぴょん はねるよ！🐰"],
    },
    BuiltinPuzzle {
        id: "lion",
        name: "ライオン",
        image_ref: "images/lion.png",
        hints: &["きいろい たてがみ！🦁", "どうぶつ の おうさま だよ！👑"],
    },
    BuiltinPuzzle {
        id: "yokosuka",
        name: "よこすかせん",
        image_ref: "images/yokosuka.jpg",
        hints: &["あお と クリームいろ！🔵", "かまくら に いく デンシャ だよ！🚃"],
    },
    BuiltinPuzzle {
        id: "yamanote",
        name: "やまのてせん",
        image_ref: "images/yamanote.jpg",
        hints: &["きみどりいろ の デンシャ！💚", "とうきょう を ぐるぐる まわるよ！♻️"],
    },
    BuiltinPuzzle {
        id: "seibu40000",
        name: "せいぶせん",
        image_ref: "images/seibu40000.jpg",
        hints: &["もぐもぐ さきっちょ が まるい！🥖", "ブルー と グリーン の いろ だよ！💙"],
    },
    BuiltinPuzzle {
        id: "tokyu-toyoko",
        name: "とうきゅう とうよこせん",
        image_ref: "images/tokyu-toyoko.jpg",
        hints: &["あかい ライン が かっこいい！🔴", "しぶや に いく デンシャ だよ！🏙️"],
    },
    BuiltinPuzzle {
        id: "shonan-shinjuku",
        name: "しょうなん しんじゅくらいん",
        image_ref: "images/shonan-shinjuku.jpg",
        hints: &["オレンジ と みどり の ライン！🍊", "とおく まで いく デンシャ だよ！🚃"],
    },
    BuiltinPuzzle {
        id: "kagayaki",
        name: "かがやき",
        image_ref: "images/kagayaki.jpg",
        hints: &["あお と きんいろ！✨", "ほくりく に いく しんかんせん！🚅"],
    },
    BuiltinPuzzle {
        id: "tsubasa",
        name: "つばさ",
        image_ref: "images/tsubasa.jpg",
        hints: &["シルバー と むらさき！💜", "やまがた に いく しんかんせん！🚅"],
    },
    BuiltinPuzzle {
        id: "saphir-odoriko",
        name: "サフィールおどりこ",
        image_ref: "images/saphir-odoriko.jpg",
        hints: &["あおい うみ みたいな いろ！🌊", "いず に いく とっきゅう だよ！💎"],
    },
    BuiltinPuzzle {
        id: "narita-express",
        name: "なりたエクスプレス",
        image_ref: "images/narita-express.jpg",
        hints: &["あかい いろ と くろい いろ！🔴⚫", "ひこうき に のる 人 が のるよ！✈️"],
    },
    BuiltinPuzzle {
        id: "joban",
        name: "じょうばんせん",
        image_ref: "images/joban.jpg",
        hints: &["あお  の ライン！💚💛", "みと や いわき に いく デンシャ だよ！🚃"],
    },
    BuiltinPuzzle {
        id: "marunouchi",
        name: "まるのうちせん",
        image_ref: "images/marunouchi.jpg",
        hints: &["あかい でんしゃ！🔴", "とうきょう の ちかてつ だよ！🚇"],
    },
    BuiltinPuzzle {
        id: "sl-taiju",
        name: "SLたいじゅ",
        image_ref: "images/sl-taiju.jpg",
        hints: &["くろくて けむり を だすよ！💨", "ふるい きかんしゃ だ！だ〜れだ？🚂"],
    },
];

/// All puzzles the player can pick from
#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    builtin: Vec<PuzzleEntry>,
    custom: Vec<PuzzleEntry>,
}

impl Default for PuzzleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PuzzleCatalog {
    /// Catalog with only the built-in pictures
    pub fn builtin() -> Self {
        let builtin = BUILTIN_PUZZLES
            .iter()
            .map(|p| PuzzleEntry::new(p.id, p.name, p.image_ref, p.hints))
            .collect();
        Self {
            builtin,
            custom: Vec::new(),
        }
    }

    pub fn builtin_entries(&self) -> &[PuzzleEntry] {
        &self.builtin
    }

    /// Built-in entries first, then user-added ones
    pub fn iter(&self) -> impl Iterator<Item = &PuzzleEntry> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn len(&self) -> usize {
        self.builtin.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &str) -> Option<&PuzzleEntry> {
        self.iter().find(|p| p.id == id)
    }

    /// Today's puzzle: day-of-month modulo the built-in count
    ///
    /// User-added pictures are never picked automatically, so adding one
    /// does not change which picture a given day shows.
    pub fn for_date(&self, date: NaiveDate) -> &PuzzleEntry {
        let index = date.day() as usize % self.builtin.len();
        &self.builtin[index]
    }

    /// Register a user-added picture
    pub fn add_custom(&mut self, entry: PuzzleEntry) -> Result<(), CatalogError> {
        if entry.id.trim().is_empty() {
            return Err(CatalogError::InvalidId);
        }
        if self.find(&entry.id).is_some() {
            return Err(CatalogError::DuplicateId(entry.id));
        }
        if self.custom.len() >= MAX_CUSTOM_PUZZLES {
            return Err(CatalogError::Full(MAX_CUSTOM_PUZZLES));
        }
        log::info!("Added custom puzzle '{}'", entry.id);
        self.custom.push(entry);
        Ok(())
    }

    /// Remove a user-added picture; built-ins cannot be removed
    pub fn remove_custom(&mut self, id: &str) -> Option<PuzzleEntry> {
        let pos = self.custom.iter().position(|p| p.id == id)?;
        Some(self.custom.remove(pos))
    }
}
