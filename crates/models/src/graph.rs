use crate::course::Course;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// A course rendered as a graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Surrogate course id, unique even when two owners share a course code
    pub id: String,
    pub label: String,
    pub title: String,
    pub group: String,
    pub course_code: String,
    pub course_name: String,
    pub department: String,
    pub credits: u32,
}

/// A prerequisite relationship, pointing from the prerequisite to its dependent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub arrows: &'static str,
    pub label: &'static str,
    pub dashes: bool,
}

impl GraphEdge {
    fn prerequisite(from: Uuid, to: Uuid) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            arrows: "to",
            label: "Prerequisite",
            dashes: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl From<&Course> for GraphNode {
    fn from(course: &Course) -> Self {
        let department = course.department.to_string();

        Self {
            id: course.id.to_string(),
            label: course.name.clone(),
            title: format!(
                "{} ({}) - {} - {} Credits",
                course.name, course.code, department, course.credits
            ),
            group: department.clone(),
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            department,
            credits: course.credits,
        }
    }
}

/// Assembles the node/edge graph for a set of courses
///
/// Nodes keep the input order and appear once per course id. Each
/// (prerequisite, dependent) pair yields at most one edge, and edges whose
/// prerequisite is not part of the course set are left out. Cycles are kept
/// as they are.
pub fn build_graph(courses: &[Course]) -> CourseGraph {
    let mut graph = CourseGraph::default();
    let mut seen_nodes = HashSet::new();

    for course in courses {
        if seen_nodes.insert(course.id) {
            graph.nodes.push(GraphNode::from(course));
        }
    }

    let mut seen_edges = HashSet::new();
    for course in courses {
        for prerequisite in &course.prerequisites {
            if !seen_nodes.contains(&prerequisite.id) {
                log::debug!(
                    "Skipping edge {} -> {}: prerequisite outside the graph",
                    prerequisite.code,
                    course.code
                );
                continue;
            }

            if seen_edges.insert((prerequisite.id, course.id)) {
                graph
                    .edges
                    .push(GraphEdge::prerequisite(prerequisite.id, course.id));
            }
        }
    }

    graph
}
