//! Ordered keyword tables for license and niche suggestions.
//!
//! Order matters: when two rows match equally well the one declared first
//! wins. Keywords are lowercase; multi-word keywords match consecutive
//! tokens.

use crate::models::LicenseType;

pub struct LicenseRule {
    pub license: LicenseType,
    pub keywords: &'static [&'static str],
}

pub struct NicheRule {
    pub niche: &'static str,
    pub keywords: &'static [&'static str],
}

pub const LICENSE_VOCAB: &[LicenseRule] = &[
    LicenseRule {
        license: LicenseType::Plr,
        keywords: &["plr", "private label", "privatelabel", "private label rights"],
    },
    LicenseRule {
        license: LicenseType::Mrr,
        keywords: &["mrr", "master resell", "master resale", "masterresell", "master resell rights"],
    },
    LicenseRule {
        license: LicenseType::Rr,
        keywords: &["rr", "resell rights", "resale rights", "resell", "reseller"],
    },
    LicenseRule {
        license: LicenseType::PersonalUse,
        keywords: &["personal use", "personal only", "pu", "non commercial"],
    },
    LicenseRule {
        license: LicenseType::Unrestricted,
        keywords: &["unrestricted", "public domain", "no restrictions", "giveaway rights"],
    },
];

/// Words that signal licensing without naming a specific grant.
pub const LICENSE_WORDS: &[&str] = &["license", "licence", "licensing", "rights", "terms"];

/// Member names that describe a package rather than content.
pub const README_WORDS: &[&str] = &[
    "readme",
    "read me",
    "instructions",
    "getting started",
    "start here",
    "quick start",
];

/// Words that describe a bundled product rather than a loose file.
pub const PACKAGE_WORDS: &[&str] = &[
    "bundle",
    "pack",
    "package",
    "kit",
    "template",
    "templates",
    "course",
    "ecourse",
    "module",
    "lesson",
    "ebook",
    "articles",
    "videos",
    "graphics",
    "swipe",
];

/// Filenames made only of these tokens carry no information.
pub const GENERIC_WORDS: &[&str] = &[
    "untitled", "document", "doc", "file", "files", "new", "copy", "download", "downloads",
    "final", "scan", "image", "img", "archive", "data", "misc", "temp", "tmp", "test", "backup",
];

/// Member extensions worth more than their category alone: ebooks,
/// video lessons and editable templates.
pub const HIGH_VALUE_EXTENSIONS: &[&str] = &[
    "pdf", "epub", "mobi", "azw3", "doc", "docx", "mp4", "mov", "m4v", "psd", "ai", "indd",
    "pptx", "ppt", "key",
];

pub const NICHE_VOCAB: &[NicheRule] = &[
    NicheRule {
        niche: "Health & Fitness",
        keywords: &[
            "health", "fitness", "weight", "weight loss", "diet", "workout", "exercise",
            "nutrition", "yoga", "wellness", "keto",
        ],
    },
    NicheRule {
        niche: "Business & Marketing",
        keywords: &[
            "business", "marketing", "entrepreneur", "sales", "seo", "affiliate", "email",
            "traffic", "social media", "branding", "leads", "copywriting",
        ],
    },
    NicheRule {
        niche: "Make Money Online",
        keywords: &[
            "money", "income", "passive income", "ecommerce", "dropshipping", "blogging",
            "freelance", "side hustle", "online business",
        ],
    },
    NicheRule {
        niche: "Self Improvement",
        keywords: &[
            "motivation", "mindset", "success", "productivity", "habits", "confidence",
            "goals", "self help", "personal development",
        ],
    },
    NicheRule {
        niche: "Personal Finance",
        keywords: &[
            "finance", "investing", "budget", "credit", "debt", "crypto", "retirement",
            "savings",
        ],
    },
    NicheRule {
        niche: "Relationships & Parenting",
        keywords: &["dating", "relationship", "relationships", "marriage", "parenting", "kids"],
    },
    NicheRule {
        niche: "Technology",
        keywords: &[
            "software", "wordpress", "ai", "chatgpt", "tech", "apps", "coding", "plugin",
        ],
    },
    NicheRule {
        niche: "Food & Recipes",
        keywords: &["recipe", "recipes", "cooking", "baking", "food", "vegan", "meal"],
    },
    NicheRule {
        niche: "Home & Garden",
        keywords: &["garden", "gardening", "home", "diy", "decor", "cleaning"],
    },
    NicheRule {
        niche: "Pets",
        keywords: &["dog", "dogs", "cat", "cats", "pet", "pets", "puppy"],
    },
    NicheRule {
        niche: "Travel",
        keywords: &["travel", "vacation", "camping", "tourism"],
    },
    NicheRule {
        niche: "Spirituality",
        keywords: &[
            "meditation", "spirituality", "manifestation", "law of attraction", "mindfulness",
        ],
    },
];

pub const DEFAULT_NICHE: &str = "General";
