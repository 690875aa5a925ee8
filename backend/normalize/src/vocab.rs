//! Canonical vocabularies for vehicle-document normalization.
//!
//! Fixed, small lists: there is no online growth. Callers may pass their own
//! slices; these defaults cover the Ukrainian vehicle market.

/// Vehicle makes commonly seen on Ukrainian registration certificates.
pub const KNOWN_MAKES: &[&str] = &[
    "Toyota",
    "Volkswagen",
    "Renault",
    "Skoda",
    "Ford",
    "Hyundai",
    "Kia",
    "Nissan",
    "Mazda",
    "Honda",
    "Mitsubishi",
    "Chevrolet",
    "Daewoo",
    "Opel",
    "Audi",
    "BMW",
    "Mercedes-Benz",
    "Peugeot",
    "Citroen",
    "Fiat",
    "Suzuki",
    "Subaru",
    "Lexus",
    "Volvo",
    "ВАЗ",
    "ЗАЗ",
];

/// Registration regions (oblasts) as printed on vehicle documents.
pub const KNOWN_REGIONS: &[&str] = &[
    "Київська",
    "Львівська",
    "Одеська",
    "Харківська",
    "Дніпропетровська",
    "Запорізька",
    "Вінницька",
    "Полтавська",
    "Черкаська",
    "Чернігівська",
    "Житомирська",
    "Сумська",
    "Рівненська",
    "Волинська",
    "Тернопільська",
    "Хмельницька",
    "Івано-Франківська",
    "Закарпатська",
    "Чернівецька",
    "Миколаївська",
    "Херсонська",
    "Кіровоградська",
    "Луганська",
    "Донецька",
];
