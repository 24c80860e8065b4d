//! Simulated crop disease detection
//!
//! No model is invoked: class probabilities are drawn from a flat Dirichlet
//! distribution and northern leaf blight is up-weighted as the most common
//! field disease. The image itself is never decoded.

use rand::Rng;
use rand_distr::Exp1;
use serde::{Deserialize, Serialize};

/// Class whose weight is boosted before renormalising
pub const BIASED_CLASS: &str = "northern_leaf_blight";

/// Weight applied to [`BIASED_CLASS`]
pub const BIAS_FACTOR: f64 = 2.0;

const MAIZE_CLASSES: &[&str] = &[
    "healthy",
    "northern_leaf_blight",
    "common_rust",
    "gray_leaf_spot",
    "southern_leaf_blight",
    "bacterial_leaf_streak",
];

const BEANS_CLASSES: &[&str] = &[
    "healthy",
    "angular_leaf_spot",
    "bean_rust",
    "bacterial_blight",
    "anthracnose",
    "mosaic_virus",
];

const TOMATOES_CLASSES: &[&str] = &[
    "healthy",
    "early_blight",
    "late_blight",
    "leaf_mold",
    "septoria_leaf_spot",
    "spider_mites",
    "target_spot",
];

const POTATOES_CLASSES: &[&str] = &[
    "healthy",
    "early_blight",
    "late_blight",
    "blackleg",
    "bacterial_wilt",
    "virus_y",
];

/// How urgently a disease needs treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Monitor
    Low,
    /// Treat soon
    Medium,
    /// Treat immediately
    High,
}

/// Advice attached to a detected class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Treatment {
    /// What the disease is
    pub description: &'static str,
    /// How to treat it
    pub treatment: &'static str,
    /// How to avoid it next season
    pub prevention: &'static str,
    /// Urgency
    pub severity: Severity,
}

const FALLBACK_TREATMENT: Treatment = Treatment {
    description: "Disease detected but treatment information not available.",
    treatment: "Consult with agricultural extension officer.",
    prevention: "Practice good crop management and monitoring.",
    severity: Severity::Medium,
};

/// Look up the treatment advice for a class
pub fn treatment_for(class: &str) -> Option<Treatment> {
    let treatment = match class {
        "northern_leaf_blight" => Treatment {
            description: "A fungal disease that causes long, elliptical lesions on maize leaves.",
            treatment: "Apply fungicides containing azoxystrobin or pyraclostrobin. Remove infected debris.",
            prevention: "Plant resistant varieties. Practice crop rotation. Monitor weather conditions.",
            severity: Severity::High,
        },
        "common_rust" => Treatment {
            description: "A fungal disease characterized by reddish-brown pustules on leaves.",
            treatment: "Apply fungicides with active ingredients like tebuconazole or azoxystrobin.",
            prevention: "Plant early. Use resistant varieties. Avoid dense planting.",
            severity: Severity::Medium,
        },
        "early_blight" => Treatment {
            description: "A fungal disease causing dark brown spots with concentric rings.",
            treatment: "Apply copper-based fungicides. Remove infected leaves.",
            prevention: "Improve air circulation. Avoid overhead irrigation.",
            severity: Severity::Medium,
        },
        "late_blight" => Treatment {
            description: "A devastating fungal disease that can destroy entire crops quickly.",
            treatment: "Apply fungicides immediately. Remove and destroy infected plants.",
            prevention: "Use resistant varieties. Monitor weather forecasts.",
            severity: Severity::High,
        },
        _ => return None,
    };
    Some(treatment)
}

/// Disease classes for a crop; unknown crops use the maize classes
pub fn classes_for(crop_type: &str) -> &'static [&'static str] {
    match crop_type.trim().to_lowercase().as_str() {
        "beans" => BEANS_CLASSES,
        "tomatoes" => TOMATOES_CLASSES,
        "potatoes" => POTATOES_CLASSES,
        _ => MAIZE_CLASSES,
    }
}

/// Probability assigned to one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    /// Class identifier (snake case)
    pub class: String,
    /// Probability in [0, 1]
    pub probability: f64,
}

/// Result of one detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseDiagnosis {
    /// Most likely class, title-cased ("Northern Leaf Blight")
    pub disease: String,
    /// Probability of the most likely class as a percentage, 2 decimals
    pub confidence: f64,
    /// Disease description
    pub description: String,
    /// Treatment advice
    pub treatment: String,
    /// Prevention advice
    pub prevention: String,
    /// Urgency
    pub severity: Severity,
    /// Crop as supplied by the caller
    pub crop_type: String,
    /// Every class with its probability, in catalog order
    ///
    /// Serialized as a list of `{class, probability}` objects so the order
    /// survives JSON encoding.
    pub all_predictions: Vec<ClassProbability>,
}

/// Simulated disease classifier
#[derive(Debug, Clone, Default)]
pub struct DiseaseDetector;

impl DiseaseDetector {
    /// Create a detector
    pub fn new() -> Self {
        Self
    }

    /// Draw class probabilities for `classes`
    ///
    /// Flat Dirichlet sample (normalised Exp(1) draws), then [`BIASED_CLASS`]
    /// is multiplied by [`BIAS_FACTOR`] and the vector renormalised.
    pub fn predict<R: Rng + ?Sized>(&self, classes: &[&str], rng: &mut R) -> Vec<f64> {
        let mut weights: Vec<f64> = classes.iter().map(|_| rng.sample::<f64, _>(Exp1)).collect();
        normalize(&mut weights);

        if let Some(idx) = classes.iter().position(|c| *c == BIASED_CLASS) {
            weights[idx] *= BIAS_FACTOR;
        }
        normalize(&mut weights);

        weights
    }

    /// Run a detection for `crop_type`
    pub fn detect<R: Rng + ?Sized>(&self, crop_type: &str, rng: &mut R) -> DiseaseDiagnosis {
        let classes = classes_for(crop_type);
        let predictions = self.predict(classes, rng);

        // First maximum wins on ties
        let (best_idx, best_prob) = predictions.iter().enumerate().fold(
            (0, f64::MIN),
            |(best_i, best_p), (i, &p)| if p > best_p { (i, p) } else { (best_i, best_p) },
        );
        let predicted = classes[best_idx];
        let advice = treatment_for(predicted).unwrap_or(FALLBACK_TREATMENT);

        DiseaseDiagnosis {
            disease: title_case(predicted),
            confidence: ((best_prob * 100.0) * 100.0).round() / 100.0,
            description: advice.description.to_string(),
            treatment: advice.treatment.to_string(),
            prevention: advice.prevention.to_string(),
            severity: advice.severity,
            crop_type: crop_type.to_string(),
            all_predictions: classes
                .iter()
                .zip(predictions)
                .map(|(class, probability)| ClassProbability {
                    class: class.to_string(),
                    probability,
                })
                .collect(),
        }
    }
}

fn normalize(weights: &mut [f64]) {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    }
}

/// "northern_leaf_blight" -> "Northern Leaf Blight"
fn title_case(class: &str) -> String {
    class
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classes_for_known_and_unknown_crops() {
        assert_eq!(classes_for("tomatoes").len(), 7);
        assert_eq!(classes_for("Beans")[2], "bean_rust");
        assert_eq!(classes_for("cassava"), MAIZE_CLASSES);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("northern_leaf_blight"), "Northern Leaf Blight");
        assert_eq!(title_case("healthy"), "Healthy");
        assert_eq!(title_case("virus_y"), "Virus Y");
    }

    #[test]
    fn test_treatment_lookup() {
        let advice = treatment_for("late_blight").unwrap();
        assert_eq!(advice.severity, Severity::High);
        assert!(treatment_for("bean_rust").is_none());
    }

    #[test]
    fn test_predictions_form_distribution() {
        let detector = DiseaseDetector::new();
        let mut rng = StdRng::seed_from_u64(11);

        for crop in ["maize", "beans", "tomatoes", "potatoes"] {
            let classes = classes_for(crop);
            let predictions = detector.predict(classes, &mut rng);
            assert_eq!(predictions.len(), classes.len());
            assert!(predictions.iter().all(|p| (0.0..=1.0).contains(p)));
            let total: f64 = predictions.iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_detect_reports_argmax() {
        let detector = DiseaseDetector::new();
        let mut rng = StdRng::seed_from_u64(5);
        let diagnosis = detector.detect("potatoes", &mut rng);

        let best = diagnosis
            .all_predictions
            .iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
            .unwrap();
        assert_eq!(diagnosis.disease, title_case(&best.class));
        assert_eq!(diagnosis.crop_type, "potatoes");
        assert!(diagnosis.confidence > 0.0 && diagnosis.confidence <= 100.0);
        assert_eq!((diagnosis.confidence * 100.0).round() / 100.0, diagnosis.confidence);
    }

    #[test]
    fn test_all_predictions_wire_shape() {
        let detector = DiseaseDetector::new();
        let diagnosis = detector.detect("beans", &mut StdRng::seed_from_u64(3));
        let json = serde_json::to_value(&diagnosis).unwrap();

        let predictions = json["all_predictions"].as_array().unwrap();
        let classes: Vec<_> = predictions
            .iter()
            .map(|p| p["class"].as_str().unwrap())
            .collect();
        assert_eq!(classes, BEANS_CLASSES);
        assert!(predictions.iter().all(|p| p["probability"].is_f64()));
    }

    #[test]
    fn test_unknown_class_uses_fallback_advice() {
        let detector = DiseaseDetector::new();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..50 {
            let diagnosis = detector.detect("beans", &mut rng);
            // No bean class has catalog advice
            assert_eq!(diagnosis.treatment, FALLBACK_TREATMENT.treatment);
            assert_eq!(diagnosis.severity, Severity::Medium);
        }
    }

    #[test]
    fn test_seeded_detection_reproducible() {
        let detector = DiseaseDetector::new();
        let a = detector.detect("maize", &mut StdRng::seed_from_u64(21));
        let b = detector.detect("maize", &mut StdRng::seed_from_u64(21));
        assert_eq!(a, b);
    }

    #[test]
    fn test_blight_bias() {
        let detector = DiseaseDetector::new();
        let mut rng = StdRng::seed_from_u64(1234);
        let mut wins = vec![0usize; MAIZE_CLASSES.len()];

        for _ in 0..2000 {
            let diagnosis = detector.detect("maize", &mut rng);
            let idx = MAIZE_CLASSES
                .iter()
                .position(|c| title_case(c) == diagnosis.disease)
                .unwrap();
            wins[idx] += 1;
        }

        let blight = wins[1];
        for (i, &count) in wins.iter().enumerate() {
            if i != 1 {
                assert!(blight > count, "blight {} vs {} {}", blight, MAIZE_CLASSES[i], count);
            }
        }
    }
}
