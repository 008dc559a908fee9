// =============================================================================
// TOOL CATALOG
// =============================================================================
//
// Tool, resource and prompt declarations advertised to the agent. Every
// definition serializes to the MCP wire shape; input schemas are plain JSON
// Schema objects.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const CREATE_DOC: &str = "create_doc";
pub const UPDATE_DOC: &str = "update_doc";
pub const DELETE_DOC: &str = "delete_doc";
pub const FORMAT_DOC: &str = "format_doc";
pub const CONVERT_TO_TABLE: &str = "convert_to_table";
pub const READ_DOC: &str = "read_doc";

pub const DOCS_LIST_URI: &str = "docs://list";
pub const SETTINGS_URI: &str = "config://settings";

pub const DRAFT_REPORT_PROMPT: &str = "draft_report";
pub const TIDY_DOCUMENT_PROMPT: &str = "tidy_document";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub input_schema: ObjectSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertyDef>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDef {
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ObjectSchema>>,
}

impl PropertyDef {
    fn typed(prop_type: &str, description: &str) -> Self {
        Self {
            prop_type: prop_type.to_string(),
            description: Some(description.to_string()),
            enum_values: None,
            items: None,
        }
    }

    pub fn string(description: &str) -> Self {
        Self::typed("string", description)
    }

    pub fn boolean(description: &str) -> Self {
        Self::typed("boolean", description)
    }

    pub fn integer(description: &str) -> Self {
        Self::typed("integer", description)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDef {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgumentDef {
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptDef {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgumentDef>,
}

fn prompt_argument(name: &str, description: &str, required: bool) -> PromptArgumentDef {
    PromptArgumentDef {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

fn object_schema(properties: Vec<(&str, PropertyDef)>, required: &[&str]) -> ObjectSchema {
    ObjectSchema {
        schema_type: "object".to_string(),
        properties: properties
            .into_iter()
            .map(|(name, def)| (name.to_string(), def))
            .collect(),
        required: required.iter().map(|r| r.to_string()).collect(),
    }
}

fn tool(name: &str, description: &str, input_schema: ObjectSchema) -> ToolDef {
    ToolDef {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn document_id_property() -> PropertyDef {
    PropertyDef::string("The Google Doc document ID or full URL.")
}

pub fn create_doc_tool() -> ToolDef {
    tool(
        CREATE_DOC,
        "Creates a new Google Doc, optionally with initial text content.",
        object_schema(
            vec![
                ("title", PropertyDef::string("Title of the new document.")),
                (
                    "content",
                    PropertyDef::string("Initial text content of the document."),
                ),
            ],
            &["title"],
        ),
    )
}

pub fn update_doc_tool() -> ToolDef {
    let mut mode = PropertyDef::string(
        "'append' adds the content after the existing text, 'replace' overwrites the body.",
    );
    mode.enum_values = Some(vec!["append".to_string(), "replace".to_string()]);

    tool(
        UPDATE_DOC,
        "Appends to or replaces the text of a Google Doc.",
        object_schema(
            vec![
                ("document_id", document_id_property()),
                ("content", PropertyDef::string("Text to write.")),
                ("mode", mode),
            ],
            &["document_id", "content"],
        ),
    )
}

pub fn delete_doc_tool() -> ToolDef {
    tool(
        DELETE_DOC,
        "Deletes a Google Doc from Drive.",
        object_schema(vec![("document_id", document_id_property())], &["document_id"]),
    )
}

pub fn format_doc_tool() -> ToolDef {
    let instruction = object_schema(
        vec![
            (
                "text",
                PropertyDef::string("Exact text to format. Every occurrence is formatted."),
            ),
            ("bold", PropertyDef::boolean("Set or clear bold.")),
            ("italic", PropertyDef::boolean("Set or clear italic.")),
            ("underline", PropertyDef::boolean("Set or clear underline.")),
            (
                "heading",
                PropertyDef::integer("Heading level 1-3 for the paragraph containing the text."),
            ),
        ],
        &["text"],
    );

    let mut formats = PropertyDef::typed("array", "Formatting instructions to apply.");
    formats.items = Some(Box::new(instruction));

    tool(
        FORMAT_DOC,
        "Applies bold/italic/underline or heading styles to text in a Google Doc.",
        object_schema(
            vec![("document_id", document_id_property()), ("formats", formats)],
            &["document_id", "formats"],
        ),
    )
}

pub fn convert_to_table_tool() -> ToolDef {
    tool(
        CONVERT_TO_TABLE,
        "Replaces a markdown table that already exists in a Google Doc with a native table.",
        object_schema(
            vec![
                ("document_id", document_id_property()),
                (
                    "table_text",
                    PropertyDef::string(
                        "The markdown table exactly as it appears in the document.",
                    ),
                ),
            ],
            &["document_id", "table_text"],
        ),
    )
}

pub fn read_doc_tool() -> ToolDef {
    tool(
        READ_DOC,
        "Reads the text content of a Google Doc.",
        object_schema(vec![("document_id", document_id_property())], &["document_id"]),
    )
}

pub fn all_tools() -> Vec<ToolDef> {
    vec![
        create_doc_tool(),
        update_doc_tool(),
        delete_doc_tool(),
        format_doc_tool(),
        convert_to_table_tool(),
        read_doc_tool(),
    ]
}

pub fn all_resources() -> Vec<ResourceDef> {
    vec![
        ResourceDef {
            uri: DOCS_LIST_URI.to_string(),
            name: "Recent documents".to_string(),
            description: "The 20 most recently modified Google Docs.".to_string(),
            mime_type: "text/plain".to_string(),
        },
        ResourceDef {
            uri: SETTINGS_URI.to_string(),
            name: "Server settings".to_string(),
            description: "Version, APIs and authentication status of this server.".to_string(),
            mime_type: "application/json".to_string(),
        },
    ]
}

pub fn all_prompts() -> Vec<PromptDef> {
    vec![
        PromptDef {
            name: DRAFT_REPORT_PROMPT.to_string(),
            description: "Draft a sectioned report as a new Google Doc.".to_string(),
            arguments: vec![
                prompt_argument("topic", "What the report is about.", true),
                prompt_argument(
                    "sections",
                    "Comma separated section titles. Defaults to a standard outline.",
                    false,
                ),
                prompt_argument("audience", "Who the report is written for.", false),
            ],
        },
        PromptDef {
            name: TIDY_DOCUMENT_PROMPT.to_string(),
            description: "Clean up an existing Google Doc: headings, emphasis and tables."
                .to_string(),
            arguments: vec![prompt_argument(
                "document_id",
                "The Google Doc document ID or full URL.",
                true,
            )],
        },
    ]
}

const DEFAULT_SECTIONS: &[&str] = &["Summary", "Background", "Findings", "Next Steps"];

fn prompt_arg<'a>(args: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn render_draft_report(args: &Map<String, Value>) -> Result<String, String> {
    let topic = prompt_arg(args, "topic").ok_or("Missing required argument: topic")?;
    let audience = prompt_arg(args, "audience").unwrap_or("a general audience");
    let sections: Vec<&str> = match prompt_arg(args, "sections") {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_SECTIONS.to_vec(),
    };

    let outline: String = sections
        .iter()
        .enumerate()
        .map(|(i, section)| format!("   {}. {}\n", i + 1, section))
        .collect();

    Ok(format!(
        "Please write a report about {topic} for {audience}.\n\n\
         1. Create a new document with {create} titled \"{topic} Report\", putting the \
         full text in `content`. Put each section title on its own line:\n\
         {outline}\
         2. Use {format} to make the document title heading 1 and every section title \
         heading 2. Bold the key figures.\n\
         3. Where data is easier to compare side by side, write it as a markdown table \
         and turn it into a native table with {convert}.\n\
         4. Finish with {read} and check the result reads well.\n",
        topic = topic,
        audience = audience,
        outline = outline,
        create = CREATE_DOC,
        format = FORMAT_DOC,
        convert = CONVERT_TO_TABLE,
        read = READ_DOC,
    ))
}

fn render_tidy_document(args: &Map<String, Value>) -> Result<String, String> {
    let document_id =
        prompt_arg(args, "document_id").ok_or("Missing required argument: document_id")?;

    Ok(format!(
        "Please tidy up the Google Doc {id}.\n\n\
         1. Read it with {read}.\n\
         2. Apply heading levels 1 to 3 to the title and section titles with {format}.\n\
         3. Convert every markdown table in the text with {convert}, one table per call, \
         passing the table exactly as it appears.\n\
         4. Do not rewrite the content unless asked; use {update} only for fixes the \
         user confirms.\n",
        id = document_id,
        read = READ_DOC,
        format = FORMAT_DOC,
        convert = CONVERT_TO_TABLE,
        update = UPDATE_DOC,
    ))
}

/// Text of the prompt `name` filled in with `args`.
pub fn render_prompt(name: &str, args: &Map<String, Value>) -> Result<String, String> {
    match name {
        DRAFT_REPORT_PROMPT => render_draft_report(args),
        TIDY_DOCUMENT_PROMPT => render_tidy_document(args),
        _ => Err(format!("Unknown prompt: {}", name)),
    }
}
