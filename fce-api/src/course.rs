#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Course {
    pub number: CourseId,
    pub name: Option<String>,
    pub units: Option<f64>,
    pub hours: f64,
    pub rate: f64,
    pub desc: Option<String>,
    pub prereqs: Option<String>,
    pub coreqs: Option<String>,
    pub instructors: Vec<Instructor>,
}

/// Headings of the rows displayed for each instructor, in display order
pub const INSTRUCTOR_FIELD_TITLES: [&str; 11] = [
    "Name",
    "Hours per week",
    "Interest in student learning",
    "Clearly explain course requirements",
    "Clear learning objectives & goals",
    "Instructor provides feedback to students",
    "Importance of subject",
    "Explains subject matter",
    "Shows respect for students",
    "Overall teaching rate",
    "Overall course rate",
];

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub name: String,
    pub hours: f64,
    pub interest_in_learning: f64,
    pub explain_requirements: f64,
    pub learning_goals: f64,
    pub feedback_to_students: f64,
    pub importance_of_subject: f64,
    pub explains_subject_matter: f64,
    pub shows_respect: f64,
    pub teaching_rate: f64,
    pub course_rate: f64,
}

impl Instructor {
    /// Row bodies, matching `INSTRUCTOR_FIELD_TITLES`
    pub fn fields(&self) -> [String; 11] {
        [
            self.name.clone(),
            format_rating(self.hours),
            format_rating(self.interest_in_learning),
            format_rating(self.explain_requirements),
            format_rating(self.learning_goals),
            format_rating(self.feedback_to_students),
            format_rating(self.importance_of_subject),
            format_rating(self.explains_subject_matter),
            format_rating(self.shows_respect),
            format_rating(self.teaching_rate),
            format_rating(self.course_rate),
        ]
    }
}

fn format_rating(r: f64) -> String {
    format!("{r:.1}")
}

/// Display strings for the course information segment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseInfoView {
    pub number: String,
    pub name: String,
    pub units: String,
    pub hours: String,
    pub rate: String,
    pub description: String,
    pub prereqs: String,
    pub coreqs: String,
}

impl From<&Course> for CourseInfoView {
    fn from(c: &Course) -> CourseInfoView {
        CourseInfoView {
            number: c.number.0.clone(),
            name: c
                .name
                .clone()
                .unwrap_or_else(|| String::from("No name available")),
            units: match c.units {
                Some(u) => format!("Units: {u:.1}"),
                None => String::from("Units not available"),
            },
            hours: format_rating(c.hours),
            rate: format_rating(c.rate),
            description: c
                .desc
                .clone()
                .unwrap_or_else(|| String::from("No description available")),
            prereqs: c.prereqs.clone().unwrap_or_else(|| String::from("None")),
            coreqs: c.coreqs.clone().unwrap_or_else(|| String::from("None")),
        }
    }
}
