use crate::destinations;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
pub struct DestinationArgs {
    pub destination: String,
}

/// Confirms the destination the user picked. Known catalog entries come
/// back annotated with their blurb so the agent has a little local color;
/// free-text destinations are echoed as-is.
#[derive(Debug)]
pub struct ConfirmDestinationTool;

pub fn confirm(destination: &str) -> String {
    match destinations::find(destination) {
        Some(entry) => format!("{} — {}", entry.name, entry.description),
        None => destination.to_string(),
    }
}

impl Tool for ConfirmDestinationTool {
    const NAME: &'static str = "confirm_destination";
    type Error = Infallible;
    type Args = DestinationArgs;
    type Output = String;

    async fn definition(&self, _param: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Confirm the destination selected for the trip".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "destination": { "type": "string", "description": "The destination chosen by the user" }
                },
                "required": ["destination"]
            }),
        }
    }

    #[instrument(name = "call_confirm_destination_tool", skip(self))]
    async fn call(&self, args: DestinationArgs) -> Result<String, Infallible> {
        let confirmed = confirm(&args.destination);
        info!(destination = %confirmed, "destination confirmed");
        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_destination_gets_blurb() {
        let confirmed = confirm("Paris, France");
        assert!(confirmed.starts_with("Paris, France"));
        assert!(confirmed.contains("City of Light"));
    }

    #[test]
    fn test_free_text_destination_echoed() {
        assert_eq!(confirm("Reykjavik, Iceland"), "Reykjavik, Iceland");
    }

    #[tokio::test]
    async fn test_tool_definition() {
        let definition = ConfirmDestinationTool.definition("test".to_string()).await;
        assert_eq!(definition.name, "confirm_destination");
        assert!(definition.parameters.to_string().contains("destination"));
    }
}
