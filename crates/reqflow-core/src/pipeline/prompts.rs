//! Prompt templates for the generation stages

/// Reference diagram shown to the markup model; it must not be copied verbatim
const REFERENCE_DIAGRAM: &str = r#"graph LR;
User -->|Accesses| App;
User -->|Create todo item| TodoItem;
User -->|Retrieve todo items| TodoItemList;
User -->|Update todo item| TodoItem;
User -->|Delete todo item| DeletedTodoItem;
User -->|Mark todo item as completed| TodoItem;
User -->|Filter todo items| TodoItemList;
User -->|Sort todo items| TodoItemList;

%% Non-functional requirements
JavaScript --> App;
FrontendFramework --> App;
CloudPlatform --> App;
UserFriendlyInterface --> App;
Security --> App;
Scalability --> App;
Database --> App;
AutomatedTesting --> App;

%% Styling
classDef requirement fill:#f9f,stroke:#333,stroke-width:2px;
classDef nonFunctionalRequirement fill:#ccc,stroke:#333,stroke-width:2px;

class App,TodoItem,TodoItemList,DeletedTodoItem requirement;
class JavaScript,FrontendFramework,CloudPlatform,UserFriendlyInterface,Security,Scalability,Database,AutomatedTesting nonFunctionalRequirement;
class User actor;"#;

pub fn requirements_prompt(project_description: &str) -> String {
    format!(
        r#"You are a software requirements analyst.

From the project below, extract:
- functional_requirements
- non_functional_requirements

Respond in JSON with:
- "functional_requirements": [...]
- "non_functional_requirements": [...]

Project: {project_description}"#
    )
}

pub fn diagram_prompt(requirements: &str) -> String {
    format!(
        r#"You are a solution architect.

Your task is to generate a **Mermaid flowchart** that visualizes the functional and non-functional requirements listed below.

---

### Use the following as a reference format (do not copy it directly):

{REFERENCE_DIAGRAM}

---

### Requirements:
{requirements}

---

Respond **only** with a valid Mermaid diagram in the following format:

```mermaid
graph LR;
...your diagram here...
```"#
    )
}

pub fn design_prompt(project_description: &str) -> String {
    format!(
        r#"You are a software architect.

Design a system for the project below. Respond in JSON format with these keys:
- "architecture": e.g. client-server, microservices, etc.
- "components": main modules or services with brief purpose.
- "data_flow": how data moves across components.

Project: {project_description}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(requirements_prompt("A todo app").ends_with("Project: A todo app"));
        assert!(design_prompt("A chat app").contains("\"data_flow\""));

        let prompt = diagram_prompt("{\"functional_requirements\": []}");
        assert!(prompt.contains("classDef requirement"));
        assert!(prompt.contains("{\"functional_requirements\": []}"));
    }
}
