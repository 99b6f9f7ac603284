use crate::db::Database;
use crate::model::{Article, CefrLevel, PartOfSpeech};
use crate::services::catalog::{self, NewWord};

struct SeedWord {
    word_de: &'static str,
    article: Option<Article>,
    pos: PartOfSpeech,
    level: CefrLevel,
    translation_ru: &'static str,
    translation_uk: &'static str,
    example_de: &'static str,
    example_ru: &'static str,
    example_uk: &'static str,
}

const DEMO_WORDS: &[SeedWord] = &[
    SeedWord {
        word_de: "Haus",
        article: Some(Article::Das),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A1,
        translation_ru: "дом",
        translation_uk: "дім",
        example_de: "Das Haus ist groß.",
        example_ru: "Дом большой.",
        example_uk: "Дім великий.",
    },
    SeedWord {
        word_de: "Hund",
        article: Some(Article::Der),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A1,
        translation_ru: "собака",
        translation_uk: "собака",
        example_de: "Der Hund schläft.",
        example_ru: "Собака спит.",
        example_uk: "Собака спить.",
    },
    SeedWord {
        word_de: "Katze",
        article: Some(Article::Die),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A1,
        translation_ru: "кошка",
        translation_uk: "кішка",
        example_de: "Die Katze trinkt Milch.",
        example_ru: "Кошка пьёт молоко.",
        example_uk: "Кішка п'є молоко.",
    },
    SeedWord {
        word_de: "Brot",
        article: Some(Article::Das),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A1,
        translation_ru: "хлеб",
        translation_uk: "хліб",
        example_de: "Ich kaufe Brot.",
        example_ru: "Я покупаю хлеб.",
        example_uk: "Я купую хліб.",
    },
    SeedWord {
        word_de: "Tisch",
        article: Some(Article::Der),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A1,
        translation_ru: "стол",
        translation_uk: "стіл",
        example_de: "Der Tisch ist alt.",
        example_ru: "Стол старый.",
        example_uk: "Стіл старий.",
    },
    SeedWord {
        word_de: "Lampe",
        article: Some(Article::Die),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A1,
        translation_ru: "лампа",
        translation_uk: "лампа",
        example_de: "Die Lampe ist neu.",
        example_ru: "Лампа новая.",
        example_uk: "Лампа нова.",
    },
    SeedWord {
        word_de: "gehen",
        article: None,
        pos: PartOfSpeech::Verb,
        level: CefrLevel::A1,
        translation_ru: "идти",
        translation_uk: "йти",
        example_de: "Wir gehen nach Hause.",
        example_ru: "Мы идём домой.",
        example_uk: "Ми йдемо додому.",
    },
    SeedWord {
        word_de: "trinken",
        article: None,
        pos: PartOfSpeech::Verb,
        level: CefrLevel::A1,
        translation_ru: "пить",
        translation_uk: "пити",
        example_de: "Ich trinke Wasser.",
        example_ru: "Я пью воду.",
        example_uk: "Я п'ю воду.",
    },
    SeedWord {
        word_de: "essen",
        article: None,
        pos: PartOfSpeech::Verb,
        level: CefrLevel::A1,
        translation_ru: "есть",
        translation_uk: "їсти",
        example_de: "Wir essen zusammen.",
        example_ru: "Мы едим вместе.",
        example_uk: "Ми їмо разом.",
    },
    SeedWord {
        word_de: "lesen",
        article: None,
        pos: PartOfSpeech::Verb,
        level: CefrLevel::A1,
        translation_ru: "читать",
        translation_uk: "читати",
        example_de: "Ich lese ein Buch.",
        example_ru: "Я читаю книгу.",
        example_uk: "Я читаю книгу.",
    },
    SeedWord {
        word_de: "schnell",
        article: None,
        pos: PartOfSpeech::Adjective,
        level: CefrLevel::A1,
        translation_ru: "быстрый",
        translation_uk: "швидкий",
        example_de: "Das Auto ist schnell.",
        example_ru: "Машина быстрая.",
        example_uk: "Машина швидка.",
    },
    SeedWord {
        word_de: "gut",
        article: None,
        pos: PartOfSpeech::Adjective,
        level: CefrLevel::A1,
        translation_ru: "хороший",
        translation_uk: "добрий",
        example_de: "Das Essen ist gut.",
        example_ru: "Еда хорошая.",
        example_uk: "Їжа добра.",
    },
    SeedWord {
        word_de: "Wohnung",
        article: Some(Article::Die),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A2,
        translation_ru: "квартира",
        translation_uk: "квартира",
        example_de: "Die Wohnung ist hell.",
        example_ru: "Квартира светлая.",
        example_uk: "Квартира світла.",
    },
    SeedWord {
        word_de: "Gespräch",
        article: Some(Article::Das),
        pos: PartOfSpeech::Noun,
        level: CefrLevel::A2,
        translation_ru: "разговор",
        translation_uk: "розмова",
        example_de: "Das Gespräch war lang.",
        example_ru: "Разговор был долгим.",
        example_uk: "Розмова була довгою.",
    },
    SeedWord {
        word_de: "arbeiten",
        article: None,
        pos: PartOfSpeech::Verb,
        level: CefrLevel::A2,
        translation_ru: "работать",
        translation_uk: "працювати",
        example_de: "Sie arbeiten viel.",
        example_ru: "Они много работают.",
        example_uk: "Вони багато працюють.",
    },
];

/// Seeds a small demo catalog into an empty store. A non-empty words
/// table leaves the catalog untouched.
pub async fn seed_demo_catalog(db: &Database) -> Result<u64, sqlx::Error> {
    let existing = catalog::word_count(db, None).await?;
    if existing > 0 {
        tracing::debug!(existing, "catalog already populated, skipping seed");
        return Ok(0);
    }

    let mut inserted = 0_u64;
    for word in DEMO_WORDS {
        catalog::insert_word(
            db,
            &NewWord {
                word_de: word.word_de.to_string(),
                article: word.article,
                pos: word.pos,
                level: word.level,
                translation_ru: word.translation_ru.to_string(),
                translation_uk: word.translation_uk.to_string(),
                example_de: Some(word.example_de.to_string()),
                example_ru: Some(word.example_ru.to_string()),
                example_uk: Some(word.example_uk.to_string()),
            },
        )
        .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "seeded demo catalog");
    Ok(inserted)
}
