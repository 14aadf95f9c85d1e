use crate::metrics::ModelMetrics;

// ---------------------------------------------------------------------------
// Static text shown under the charts
// ---------------------------------------------------------------------------

pub const TITLE: &str = "Graduation Prediction";
pub const SUBTITLE: &str = "📊 Data analysis and model visualization";

pub const ACCURACY: &str = "Random Forest or Decision Tree C4.5 is recommended for this dataset: \
their predictions are more stable and make fewer errors than SVM.";

pub const CONFUSION: &str = "Decision Tree C4.5 and Random Forest perform similarly, with 321 TN, \
4 FP, 19-20 FN and 134-135 TP. SVM makes slightly more errors (15 FP), which may indicate a \
weakness in separating the negative class.";

pub const DISTRIBUTION: &str = "Number of students who graduated and did not graduate in the \
analysed data.";

pub const CORRELATION: &str = "GPA and absences are the most influential factors in the \
prediction. Study time has a moderate effect. Parental education, tutoring and volunteering are \
less significant.";

pub const GPA: &str = "1. Students with a higher GPA have a better chance of graduating.\n\
2. Most students who did not graduate have a low GPA, so GPA is an important factor in academic \
success.\n\n\
Conclusion: raising GPA through tutoring, mentoring or academic improvement programs can be an \
effective way to raise graduation rates.";

pub const ABSENCES: &str = "1. Students with many absences tend to graduate less often.\n\
2. Most students who graduated attended class consistently, so attendance plays an important \
role in academic success.\n\
3. Students who were often absent but still graduated probably had other ways to learn, such as \
self-study or good access to course material.\n\n\
Keeping attendance disciplined, and making sure students can reach the material when they must \
miss class, can help raise graduation rates.";

pub const STUDY_TIME: &str = "Weekly study time of students and its effect on graduation.";

pub const STUDY_DENSITY: &str = "How students' study time is distributed over a week.";

/// One-line summary of the derived figures for the selected model.
pub fn model_summary(m: &ModelMetrics) -> String {
    let cm = &m.confusion;
    format!(
        "{}: reported accuracy {:.4} · precision {:.3} · recall {:.3} · F1 {:.3} · {} test samples",
        m.model,
        m.accuracy,
        cm.precision(),
        cm.recall(),
        cm.f1(),
        cm.total()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ModelName;

    #[test]
    fn test_model_summary() {
        let s = model_summary(ModelName::Svm.metrics());
        assert!(s.starts_with("SVM: reported accuracy 0.9290"));
        assert!(s.ends_with("479 test samples"));
    }
}
