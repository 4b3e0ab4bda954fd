//! Service catalog. A selected service becomes the conversation's context and
//! the default payment description.

use crate::pricing::format_amount;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
    Expert,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Complexity::Simple => "Простой",
            Complexity::Medium => "Средний",
            Complexity::Complex => "Сложный",
            Complexity::Expert => "Экспертный",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    pub complexity: Complexity,
    pub volume: &'static str,
    pub turnaround: &'static str,
    /// Roubles.
    pub price: u64,
}

impl Service {
    pub fn price_label(&self) -> String {
        format!("{} ₽", format_amount(self.price))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    pub services: &'static [Service],
}

const fn service(
    name: &'static str,
    complexity: Complexity,
    volume: &'static str,
    turnaround: &'static str,
    price: u64,
) -> Service {
    Service {
        name,
        complexity,
        volume,
        turnaround,
        price,
    }
}

use Complexity::*;

pub static CATALOG: &[Category] = &[
    Category {
        id: "contracts",
        title: "Анализ договоров",
        services: &[
            service("Экспресс-проверка договора", Simple, "до 10 стр.", "30 мин", 1000),
            service("Полный анализ договора", Medium, "до 30 стр.", "2 часа", 3000),
            service("Анализ сложного контракта", Complex, "до 100 стр.", "1 день", 8000),
            service("Комплексная экспертиза пакета", Expert, "без ограничений", "3 дня", 20000),
        ],
    },
    Category {
        id: "consulting",
        title: "Консультации по законодательству",
        services: &[
            service("Устная консультация", Simple, "1 вопрос", "15 мин", 1000),
            service("Письменное заключение", Medium, "до 5 вопросов", "1 час", 3000),
            service("Правовой анализ ситуации", Complex, "комплексный", "1 день", 10000),
            service("Стратегическое консультирование", Expert, "без ограничений", "5 дней", 30000),
        ],
    },
    Category {
        id: "documents",
        title: "Подготовка документов",
        services: &[
            service("Типовой документ", Simple, "1 документ", "1 час", 2000),
            service("Нестандартный документ", Medium, "1-3 документа", "4 часа", 5000),
            service("Пакет юридических документов", Complex, "до 10 документов", "2 дня", 15000),
            service("Полный комплект под проект", Expert, "без ограничений", "7 дней", 50000),
        ],
    },
];

/// Look a service up by name, ignoring case and surrounding whitespace.
pub fn find_service(name: &str) -> Option<&'static Service> {
    let needle = name.trim().to_lowercase();
    CATALOG
        .iter()
        .flat_map(|c| c.services.iter())
        .find(|s| s.name.to_lowercase() == needle)
}

/// First assistant message of a new conversation.
pub fn welcome_text(service: Option<&str>) -> String {
    match service {
        Some(name) => format!(
            "Вы выбрали услугу: \"{}\". Пожалуйста, загрузите документы для анализа, \
             и я определю объём, сложность и точную стоимость работы.",
            name
        ),
        None => "Здравствуйте! Я ваш финансово-юридический помощник. Выберите услугу из \
                 каталога или опишите вашу задачу, и я помогу подобрать оптимальное решение."
            .to_string(),
    }
}
