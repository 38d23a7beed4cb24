use crate::recommend::signals::{AgeBracket, BmiBracket, Gender, UserSignalBundle};

impl AgeBracket {
    pub fn phrase(self) -> &'static str {
        match self {
            AgeBracket::Youth => "nutrition for children teenagers",
            AgeBracket::YoungAdult => "nutrition for young adults",
            AgeBracket::Adult => "nutrition for adults",
            AgeBracket::Senior => "nutrition for seniors elderly",
        }
    }
}

impl BmiBracket {
    pub fn phrase(self) -> &'static str {
        match self {
            BmiBracket::Underweight => "underweight nutrition gain weight healthy",
            BmiBracket::Healthy => "healthy weight maintenance",
            BmiBracket::Overweight => "overweight nutrition weight management",
            BmiBracket::Obese => "obesity nutrition weight loss",
        }
    }
}

impl Gender {
    pub fn phrase(self) -> Option<&'static str> {
        match self {
            Gender::Male => Some("men's nutrition"),
            Gender::Female => Some("women's nutrition"),
            Gender::Other => None,
        }
    }
}

/// Query fragments in precedence order:
/// age, gender, food items, BMI, health conditions.
/// Each signal contributes at most one fragment.
pub fn fragments(signals: &UserSignalBundle) -> Vec<String> {
    let mut parts = Vec::with_capacity(5);

    if let Some(age) = signals.profile.age {
        parts.push(AgeBracket::from_age(age).phrase().to_string());
    }
    if let Some(phrase) = signals.profile.gender.and_then(Gender::phrase) {
        parts.push(phrase.to_string());
    }
    if !signals.food_items.is_empty() {
        parts.push(format!("nutrition {}", signals.food_items.join(" ")));
    }
    if let Some(bracket) = signals.health_status.bmi.and_then(BmiBracket::from_bmi) {
        parts.push(bracket.phrase().to_string());
    }
    if !signals.health_status.conditions.is_empty() {
        parts.push(format!("nutrition for {}", signals.health_status.conditions.join(" ")));
    }
    parts
}

/// Turn user signals into a retrieval query.
/// Pure: the same bundle always gives the same string; an empty bundle gives `""`.
pub fn synthesize(signals: &UserSignalBundle) -> String {
    fragments(signals).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_bundle_matches_reference_query() {
        let signals = UserSignalBundle::new()
            .with_age(45)
            .with_gender(Gender::Male)
            .with_food_items(["chicken"])
            .with_bmi(28.5)
            .with_conditions(["pre-diabetes"]);
        assert_eq!(
            synthesize(&signals),
            "nutrition for adults men's nutrition nutrition chicken overweight nutrition weight management nutrition for pre-diabetes"
        );
    }

    #[test]
    fn empty_bundle_is_empty_query() {
        assert_eq!(synthesize(&UserSignalBundle::new()), "");
    }

    #[test]
    fn other_gender_contributes_nothing() {
        let signals = UserSignalBundle::new().with_gender(Gender::Other);
        assert!(fragments(&signals).is_empty());
    }

    #[test]
    fn precedence_is_fixed() {
        // builder order is irrelevant to fragment order
        let signals = UserSignalBundle::new()
            .with_conditions(["high blood pressure", "pre-diabetes"])
            .with_bmi(17.0)
            .with_food_items(["rice", "broccoli"])
            .with_gender(Gender::Female)
            .with_age(12);
        assert_eq!(
            fragments(&signals),
            vec![
                "nutrition for children teenagers",
                "women's nutrition",
                "nutrition rice broccoli",
                "underweight nutrition gain weight healthy",
                "nutrition for high blood pressure pre-diabetes",
            ]
        );
    }

    #[test]
    fn each_bracket_phrase() {
        let q = |age| synthesize(&UserSignalBundle::new().with_age(age));
        assert_eq!(q(22), "nutrition for young adults");
        assert_eq!(q(70), "nutrition for seniors elderly");
        let b = |bmi| synthesize(&UserSignalBundle::new().with_bmi(bmi));
        assert_eq!(b(22.0), "healthy weight maintenance");
        assert_eq!(b(35.0), "obesity nutrition weight loss");
        assert_eq!(b(f64::INFINITY), "");
    }

    #[test]
    fn synthesize_is_deterministic() {
        let signals = UserSignalBundle::new().with_age(33).with_food_items(["salmon"]);
        assert_eq!(synthesize(&signals), synthesize(&signals.clone()));
    }
}
