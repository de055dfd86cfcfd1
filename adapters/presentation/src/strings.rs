//! Localized string catalog for HUD and overlay text.
//!
//! Four translation tables ship built in; front ends may replace them with
//! deserialized tables of their own. Lookups never fail: a missing entry
//! falls back to the English table and finally to the key's own name.

use log::{info, warn};
use serde::Deserialize;
use std::{collections::HashMap, error::Error, fmt, str::FromStr};

/// Languages a catalog table can be keyed by.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Ukrainian.
    Uk,
    /// Spanish.
    Es,
    /// Polish.
    Pl,
}

impl Language {
    /// Every supported language, in catalog order.
    pub const ALL: [Self; 4] = [Self::En, Self::Uk, Self::Es, Self::Pl];

    /// Two-letter code used in configuration and storage.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Uk => "uk",
            Self::Es => "es",
            Self::Pl => "pl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "uk" => Ok(Self::Uk),
            "es" => Ok(Self::Es),
            "pl" => Ok(Self::Pl),
            _ => Err(UnknownLanguage {
                code: value.to_owned(),
            }),
        }
    }
}

/// Error raised when a language code is not recognized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownLanguage {
    code: String,
}

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported language code '{}' (expected en, uk, es or pl)",
            self.code
        )
    }
}

impl Error for UnknownLanguage {}

/// Keys addressing every localized string the game surfaces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringKey {
    /// Window and start-overlay title.
    Title,
    /// Heading above the control hints.
    ControlsHeading,
    /// Hint for click-to-move guidance.
    ControlClick,
    /// Hint for drag-to-follow guidance.
    ControlDrag,
    /// Hint for keyboard guidance.
    ControlKeys,
    /// Heading above the goal description.
    GoalsHeading,
    /// Goal line about recruiting animals.
    GoalCollect,
    /// Goal line about delivering animals.
    GoalDeliver,
    /// Label of the start button.
    StartGame,
    /// Label of the score counter.
    Score,
    /// Label of the pause control and banner.
    Pause,
    /// Label of the resume control.
    Resume,
    /// Title of the completion banner.
    GameCompleted,
    /// Cheer line under the completion banner.
    Congratulations,
    /// Label in front of the finished run's time.
    YourTime,
    /// Label in front of the record time.
    BestTime,
    /// Label of the restart button.
    PlayAgain,
    /// Animal trivia line shown with the completion results.
    FunFact1,
    /// Animal trivia line shown with the completion results.
    FunFact2,
    /// Animal trivia line shown with the completion results.
    FunFact3,
    /// Animal trivia line shown with the completion results.
    FunFact4,
    /// Animal trivia line shown with the completion results.
    FunFact5,
    /// Animal trivia line shown with the completion results.
    FunFact6,
    /// Animal trivia line shown with the completion results.
    FunFact7,
    /// Animal trivia line shown with the completion results.
    FunFact8,
    /// Animal trivia line shown with the completion results.
    FunFact9,
    /// Animal trivia line shown with the completion results.
    FunFact10,
}

impl StringKey {
    /// Every catalog key, in display order.
    pub const ALL: [Self; 27] = [
        Self::Title,
        Self::ControlsHeading,
        Self::ControlClick,
        Self::ControlDrag,
        Self::ControlKeys,
        Self::GoalsHeading,
        Self::GoalCollect,
        Self::GoalDeliver,
        Self::StartGame,
        Self::Score,
        Self::Pause,
        Self::Resume,
        Self::GameCompleted,
        Self::Congratulations,
        Self::YourTime,
        Self::BestTime,
        Self::PlayAgain,
        Self::FunFact1,
        Self::FunFact2,
        Self::FunFact3,
        Self::FunFact4,
        Self::FunFact5,
        Self::FunFact6,
        Self::FunFact7,
        Self::FunFact8,
        Self::FunFact9,
        Self::FunFact10,
    ];

    /// The trivia keys, for picking one line to show per completion.
    pub const FUN_FACTS: [Self; 10] = [
        Self::FunFact1,
        Self::FunFact2,
        Self::FunFact3,
        Self::FunFact4,
        Self::FunFact5,
        Self::FunFact6,
        Self::FunFact7,
        Self::FunFact8,
        Self::FunFact9,
        Self::FunFact10,
    ];

    /// Name used in serialized tables and as the last-resort display text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ControlsHeading => "controlsHeading",
            Self::ControlClick => "controlClick",
            Self::ControlDrag => "controlDrag",
            Self::ControlKeys => "controlKeys",
            Self::GoalsHeading => "goalsHeading",
            Self::GoalCollect => "goalCollect",
            Self::GoalDeliver => "goalDeliver",
            Self::StartGame => "startGame",
            Self::Score => "score",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::GameCompleted => "gameCompleted",
            Self::Congratulations => "congratulations",
            Self::YourTime => "yourTime",
            Self::BestTime => "bestTime",
            Self::PlayAgain => "playAgain",
            Self::FunFact1 => "funFact1",
            Self::FunFact2 => "funFact2",
            Self::FunFact3 => "funFact3",
            Self::FunFact4 => "funFact4",
            Self::FunFact5 => "funFact5",
            Self::FunFact6 => "funFact6",
            Self::FunFact7 => "funFact7",
            Self::FunFact8 => "funFact8",
            Self::FunFact9 => "funFact9",
            Self::FunFact10 => "funFact10",
        }
    }
}

/// Translation tables keyed by language, as deserialized from overlay files.
pub type CatalogTables = HashMap<Language, HashMap<StringKey, String>>;

/// Localized string catalog with a currently selected language.
#[derive(Clone, Debug)]
pub struct Catalog {
    language: Language,
    tables: CatalogTables,
}

impl Catalog {
    /// Creates a catalog carrying the built-in tables for every language.
    #[must_use]
    pub fn builtin() -> Self {
        let mut tables = CatalogTables::new();
        let _ = tables.insert(Language::En, table(ENGLISH));
        let _ = tables.insert(Language::Uk, table(UKRAINIAN));
        let _ = tables.insert(Language::Es, table(SPANISH));
        let _ = tables.insert(Language::Pl, table(POLISH));
        Self {
            language: Language::En,
            tables,
        }
    }

    /// Creates a catalog from external tables, selecting English.
    ///
    /// Tables may be partial; lookups fall back per [`Catalog::translate`].
    #[must_use]
    pub fn from_tables(tables: CatalogTables) -> Self {
        Self {
            language: Language::En,
            tables,
        }
    }

    /// Returns the currently selected language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Selects a language, keeping the previous one when no table exists.
    pub fn set_language(&mut self, language: Language) {
        if self.tables.contains_key(&language) {
            let previous = self.language;
            self.language = language;
            info!("catalog language changed from {previous} to {language}");
        } else {
            warn!(
                "language {language} has no catalog table, keeping {}",
                self.language
            );
        }
    }

    /// Resolves a key against the selected language.
    ///
    /// Falls back to the English table and finally to the key name, warning
    /// once per failed lookup.
    #[must_use]
    pub fn translate(&self, key: StringKey) -> &str {
        if let Some(text) = self.lookup(self.language, key) {
            return text;
        }
        warn!(
            "translation '{}' missing in the {} catalog",
            key.name(),
            self.language
        );
        if self.language != Language::En {
            if let Some(text) = self.lookup(Language::En, key) {
                return text;
            }
        }
        key.name()
    }

    fn lookup(&self, language: Language, key: StringKey) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|table| table.get(&key))
            .map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn table(entries: [(StringKey, &str); 27]) -> HashMap<StringKey, String> {
    entries
        .into_iter()
        .map(|(key, text)| (key, text.to_owned()))
        .collect()
}

const ENGLISH: [(StringKey, &str); 27] = [
    (StringKey::Title, "Herdsman Game"),
    (StringKey::ControlsHeading, "Controls"),
    (
        StringKey::ControlClick,
        "Click anywhere to move the Hero.",
    ),
    (
        StringKey::ControlDrag,
        "Hold the mouse button and drag to make the Hero follow the cursor.",
    ),
    (
        StringKey::ControlKeys,
        "Use Arrow Keys or W/A/S/D to move the Hero.",
    ),
    (StringKey::GoalsHeading, "Goal"),
    (
        StringKey::GoalCollect,
        "Collect animals by moving close to them (max 5 at a time).",
    ),
    (
        StringKey::GoalDeliver,
        "Lead them into the paddock to score points.",
    ),
    (StringKey::StartGame, "Start Game"),
    (StringKey::Score, "Score"),
    (StringKey::Pause, "Pause"),
    (StringKey::Resume, "Resume"),
    (StringKey::GameCompleted, "Game Completed!"),
    (StringKey::Congratulations, "Congratulations!🎉🥳"),
    (StringKey::YourTime, "Your time"),
    (StringKey::BestTime, "Best time"),
    (StringKey::PlayAgain, "Play Again"),
    (
        StringKey::FunFact1,
        "Sheep have excellent memories and can remember up to 50 different sheep faces for over two years!",
    ),
    (
        StringKey::FunFact2,
        "Cows have best friends and get stressed when separated from their preferred companions.",
    ),
    (
        StringKey::FunFact3,
        "Pigs are among the most intelligent animals and can learn to play video games better than some primates.",
    ),
    (
        StringKey::FunFact4,
        "Goats have rectangular pupils that give them 320-degree vision, helping them spot predators from any angle.",
    ),
    (
        StringKey::FunFact5,
        "Horses can sleep both standing up and lying down, but they only enter deep REM sleep when lying down.",
    ),
    (
        StringKey::FunFact6,
        "Chickens can remember over 100 different faces of people or other chickens and can recognize them even after several months.",
    ),
    (
        StringKey::FunFact7,
        "Ducks have waterproof feathers due to special oil glands that keep them dry even in heavy rain.",
    ),
    (
        StringKey::FunFact8,
        "Rabbits have 360-degree vision and can see behind them without turning their heads.",
    ),
    (
        StringKey::FunFact9,
        "Geese mate for life and will mourn the loss of their partner, sometimes refusing to eat or becoming depressed.",
    ),
    (
        StringKey::FunFact10,
        "Donkeys are incredibly loyal and have been known to protect other farm animals from predators like coyotes and wolves.",
    ),
];

const UKRAINIAN: [(StringKey, &str); 27] = [
    (StringKey::Title, "Herdsman Game"),
    (StringKey::ControlsHeading, "Керування"),
    (
        StringKey::ControlClick,
        "Клікніть будь-де, щоб рухати героя.",
    ),
    (
        StringKey::ControlDrag,
        "Утримуйте кнопку миші та тягніть, щоб герой слідував за курсором.",
    ),
    (
        StringKey::ControlKeys,
        "Використовуйте стрілки або W/A/S/D для руху героя.",
    ),
    (StringKey::GoalsHeading, "Мета"),
    (
        StringKey::GoalCollect,
        "Збирайте тварин, підходячи до них (максимум 5 одночасно).",
    ),
    (
        StringKey::GoalDeliver,
        "Ведіть їх у загін, щоб отримати очки.",
    ),
    (StringKey::StartGame, "Почати гру"),
    (StringKey::Score, "Рахунок"),
    (StringKey::Pause, "Пауза"),
    (StringKey::Resume, "Продовжити"),
    (StringKey::GameCompleted, "Гра Завершена!"),
    (StringKey::Congratulations, "Вітання!🎉🥳"),
    (StringKey::YourTime, "Ваш час"),
    (StringKey::BestTime, "Найкращий час"),
    (StringKey::PlayAgain, "Грати Знову"),
    (
        StringKey::FunFact1,
        "Вівці мають відмінну пам'ять і можуть запам'ятовувати до 50 різних облич вівців більше двох років!",
    ),
    (
        StringKey::FunFact2,
        "Корови мають найкращих друзів і страждають, коли їх розлучають з улюбленими компаньйонами.",
    ),
    (
        StringKey::FunFact3,
        "Свині є одними з найрозумніших тварин і можуть навчитися грати у відеоігри краще за деяких приматів.",
    ),
    (
        StringKey::FunFact4,
        "Кози мають прямокутні зіниці, що дає їм 320-градусний огляд, допомагаючи помічати хижаків з будь-якого кута.",
    ),
    (
        StringKey::FunFact5,
        "Коні можуть спати і стоячи, і лежачи, але глибокий REM-сон вони відчувають тільки лежачи.",
    ),
    (
        StringKey::FunFact6,
        "Кури можуть запам'ятовувати понад 100 різних облич людей або інших курей і розпізнавати їх навіть через кілька місяців.",
    ),
    (
        StringKey::FunFact7,
        "Качки мають водонепроникне пір'я завдяки спеціальним олійним залозам, що тримає їх сухими навіть під сильним дощем.",
    ),
    (
        StringKey::FunFact8,
        "Кролики мають 360-градусний огляд і можуть бачити позаду себе, не повертаючи голови.",
    ),
    (
        StringKey::FunFact9,
        "Гуси створюють пари на все життя і будуть оплакувати втрату партнера, іноді відмовляючись від їжі або впадаючи в депресію.",
    ),
    (
        StringKey::FunFact10,
        "Віслюки неймовірно вірні і відомі тим, що захищають інших сільськогосподарських тварин від хижаків, таких як койоти та вовки.",
    ),
];

const SPANISH: [(StringKey, &str); 27] = [
    (StringKey::Title, "Herdsman Game"),
    (StringKey::ControlsHeading, "Controles"),
    (
        StringKey::ControlClick,
        "Haz clic en cualquier lugar para mover al Héroe.",
    ),
    (
        StringKey::ControlDrag,
        "Mantén pulsado el botón del ratón y arrastra para que el Héroe siga el cursor.",
    ),
    (
        StringKey::ControlKeys,
        "Usa las Flechas o W/A/S/D para mover al Héroe.",
    ),
    (StringKey::GoalsHeading, "Objetivo"),
    (
        StringKey::GoalCollect,
        "Recoge animales acercándote a ellos (máximo 5 a la vez).",
    ),
    (
        StringKey::GoalDeliver,
        "Llévalos al corral para ganar puntos.",
    ),
    (StringKey::StartGame, "Comenzar"),
    (StringKey::Score, "Puntuación"),
    (StringKey::Pause, "Pausa"),
    (StringKey::Resume, "Reanudar"),
    (StringKey::GameCompleted, "Juego Completado!"),
    (StringKey::Congratulations, "¡Felicidades!🎉🥳"),
    (StringKey::YourTime, "Tu tiempo"),
    (StringKey::BestTime, "Mejor tiempo"),
    (StringKey::PlayAgain, "Jugar de Nuevo"),
    (
        StringKey::FunFact1,
        "¡Las ovejas tienen una memoria excelente y pueden recordar hasta 50 caras diferentes de ovejas durante más de dos años!",
    ),
    (
        StringKey::FunFact2,
        "Las vacas tienen mejores amigos y se estresan cuando las separan de sus compañeros preferidos.",
    ),
    (
        StringKey::FunFact3,
        "Los cerdos están entre los animales más inteligentes y pueden aprender a jugar videojuegos mejor que algunos primates.",
    ),
    (
        StringKey::FunFact4,
        "Las cabras tienen pupilas rectangulares que les dan una visión de 320 grados, ayudándoles a detectar depredadores desde cualquier ángulo.",
    ),
    (
        StringKey::FunFact5,
        "Los caballos pueden dormir tanto de pie como acostados, pero solo entran en sueño REM profundo cuando están acostados.",
    ),
    (
        StringKey::FunFact6,
        "Las gallinas pueden recordar más de 100 caras diferentes de personas u otras gallinas y pueden reconocerlas incluso después de varios meses.",
    ),
    (
        StringKey::FunFact7,
        "Los patos tienen plumas impermeables debido a glándulas especiales de aceite que los mantienen secos incluso bajo lluvia intensa.",
    ),
    (
        StringKey::FunFact8,
        "Los conejos tienen una visión de 360 grados y pueden ver detrás de ellos sin girar la cabeza.",
    ),
    (
        StringKey::FunFact9,
        "Los gansos se emparejan de por vida y llorarán la pérdida de su pareja, a veces negándose a comer o deprimiéndose.",
    ),
    (
        StringKey::FunFact10,
        "Los burros son increíblemente leales y se sabe que protegen a otros animales de granja de depredadores como coyotes y lobos.",
    ),
];

const POLISH: [(StringKey, &str); 27] = [
    (StringKey::Title, "Herdsman Game"),
    (StringKey::ControlsHeading, "Sterowanie"),
    (
        StringKey::ControlClick,
        "Kliknij gdziekolwiek, aby poruszyć Bohatera.",
    ),
    (
        StringKey::ControlDrag,
        "Przytrzymaj przycisk myszy i przeciągnij, aby Bohater podążał za kursorem.",
    ),
    (
        StringKey::ControlKeys,
        "Użyj strzałek lub W/A/S/D, aby poruszać Bohaterem.",
    ),
    (StringKey::GoalsHeading, "Cel"),
    (
        StringKey::GoalCollect,
        "Zbieraj zwierzęta, podchodząc do nich (maks. 5 naraz).",
    ),
    (
        StringKey::GoalDeliver,
        "Zaprowadź je do zagrody, aby zdobywać punkty.",
    ),
    (StringKey::StartGame, "Start"),
    (StringKey::Score, "Wynik"),
    (StringKey::Pause, "Pauza"),
    (StringKey::Resume, "Wznów"),
    (StringKey::GameCompleted, "Gra Zakończona!"),
    (StringKey::Congratulations, "Gratulacje!🎉🥳"),
    (StringKey::YourTime, "Twój czas"),
    (StringKey::BestTime, "Najlepszy czas"),
    (StringKey::PlayAgain, "Graj Ponownie"),
    (
        StringKey::FunFact1,
        "Owce mają doskonałą pamięć i mogą zapamiętać do 50 różnych twarzy owiec przez ponad dwa lata!",
    ),
    (
        StringKey::FunFact2,
        "Krowy mają najlepszych przyjaciół i stresują się, gdy są oddzielone od swoich ulubionych towarzyszy.",
    ),
    (
        StringKey::FunFact3,
        "Świnie są jednymi z najinteligentniejszych zwierząt i mogą nauczyć się grać w gry wideo lepiej niż niektóre naczelne.",
    ),
    (
        StringKey::FunFact4,
        "Kozy mają prostokątne źrenice, które dają im 320-stopniowe pole widzenia, pomagając im dostrzec drapieżniki z każdego kąta.",
    ),
    (
        StringKey::FunFact5,
        "Konie mogą spać zarówno stojąc, jak i leżąc, ale wchodzą w głęboki sen REM tylko wtedy, gdy leżą.",
    ),
    (
        StringKey::FunFact6,
        "Kury mogą zapamiętać ponad 100 różnych twarzy ludzi lub innych kur i rozpoznawać je nawet po kilku miesiącach.",
    ),
    (
        StringKey::FunFact7,
        "Kaczki mają wodoodporne pióra dzięki specjalnym gruczołom olejowym, które utrzymują je suche nawet podczas silnego deszczu.",
    ),
    (
        StringKey::FunFact8,
        "Króliki mają 360-stopniowe pole widzenia i mogą widzieć za sobą bez obracania głowy.",
    ),
    (
        StringKey::FunFact9,
        "Gęsi łączą się w pary na całe życie i będą opłakiwać stratę partnera, czasami odmawiając jedzenia lub popadając w depresję.",
    ),
    (
        StringKey::FunFact10,
        "Osły są niesamowicie lojalne i znane są z ochrony innych zwierząt gospodarskich przed drapieżnikami, takimi jak kojoty i wilki.",
    ),
];
