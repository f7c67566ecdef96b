//! Vendor tool catalogs
//!
//! Three static declarative catalogs over the same tool surface, one
//! per LLM vendor convention. They are process-wide immutable constants
//! and must stay in lockstep with the router's name set in
//! [`crate::tools::TOOL_NAMES`]; the OpenAI catalog is derived from the
//! Anthropic one since both carry plain JSON Schema parameters, while
//! Google needs its own type-tag spellings.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (e.g., "recall")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,
}

fn tool(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Anthropic-style tool definitions
pub static ANTHROPIC_TOOLS: Lazy<Vec<Tool>> = Lazy::new(|| {
    vec![
        tool(
            "focus",
            "Stores a piece of information in short-term working memory (Flux).",
            json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "The information to focus on."
                    }
                },
                "required": ["content"]
            }),
        ),
        tool(
            "recall",
            "Recalls relevant memories from long-term memory based on a query.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The query to search for."
                    }
                },
                "required": ["query"]
            }),
        ),
        tool(
            "remember",
            "Stores information in long-term memory for future recall.",
            json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "The information to remember."
                    }
                },
                "required": ["content"]
            }),
        ),
        // Working memory (structured variables)
        tool(
            "setVariable",
            "Sets a structured variable in working memory.",
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the variable."
                    },
                    "value": {
                        "description": "The value to store (any JSON-serializable type)."
                    },
                    "source": {
                        "type": "string",
                        "description": "Source of the variable: 'system', 'reasoning', 'retrieval', 'perception', or 'explicit'."
                    }
                },
                "required": ["name", "value"]
            }),
        ),
        tool(
            "getVariable",
            "Gets a structured variable from working memory.",
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the variable to retrieve."
                    }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "listVariables",
            "Lists all variables in working memory.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        tool(
            "deleteVariable",
            "Deletes a variable from working memory.",
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the variable to delete."
                    }
                },
                "required": ["name"]
            }),
        ),
        // Goals
        tool(
            "addGoal",
            "Adds a new goal to the agent's goal stack.",
            json!({
                "type": "object",
                "properties": {
                    "description": {
                        "type": "string",
                        "description": "The description of the goal."
                    },
                    "priority": {
                        "type": "string",
                        "description": "Priority level: 'low', 'medium', 'high', or 'critical'."
                    },
                    "parentId": {
                        "type": "string",
                        "description": "Optional parent goal ID for hierarchical goals."
                    }
                },
                "required": ["description"]
            }),
        ),
        tool(
            "updateGoal",
            "Updates the status of an existing goal.",
            json!({
                "type": "object",
                "properties": {
                    "goalId": {
                        "type": "string",
                        "description": "The ID of the goal to update."
                    },
                    "status": {
                        "type": "string",
                        "description": "New status: 'active', 'suspended', 'achieved', 'abandoned', or 'failed'."
                    }
                },
                "required": ["goalId", "status"]
            }),
        ),
        tool(
            "listGoals",
            "Lists all goals, optionally filtered by status.",
            json!({
                "type": "object",
                "properties": {
                    "statusFilter": {
                        "type": "string",
                        "description": "Optional status to filter by."
                    }
                }
            }),
        ),
        // Actions
        tool(
            "submitAction",
            "Submits an action for execution and logging.",
            json!({
                "type": "object",
                "properties": {
                    "agentId": {
                        "type": "string",
                        "description": "The ID of the agent submitting the action."
                    },
                    "actionType": {
                        "type": "string",
                        "description": "Type of action: 'reason', 'retrieve', 'learn', or 'ground'."
                    },
                    "actionDetails": {
                        "description": "The action details (any JSON-serializable object)."
                    }
                },
                "required": ["agentId", "actionType", "actionDetails"]
            }),
        ),
        tool(
            "getActionLog",
            "Gets the action log for the current run.",
            json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of entries to retrieve."
                    },
                    "actionTypeFilter": {
                        "type": "string",
                        "description": "Optional action type to filter by."
                    }
                }
            }),
        ),
        // Flux
        tool(
            "drift",
            "Reads the current items in short-term working memory (Flux).",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        // Concepts
        tool(
            "defineConcept",
            "Defines a concept with a JSON schema for structured knowledge.",
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the concept."
                    },
                    "schema": {
                        "description": "The JSON schema defining the concept structure."
                    }
                },
                "required": ["name", "schema"]
            }),
        ),
        tool(
            "listConcepts",
            "Lists all defined concepts and their schemas.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        // Decision cycles
        tool(
            "runCycle",
            "Runs a decision cycle with optional action candidates.",
            json!({
                "type": "object",
                "properties": {
                    "agentId": {
                        "type": "string",
                        "description": "The ID of the agent running the cycle."
                    },
                    "candidates": {
                        "type": "array",
                        "description": "Optional array of action candidates with scores.",
                        "items": {
                            "type": "object",
                            "properties": {
                                "actionType": {
                                    "type": "string",
                                    "description": "Type of action."
                                },
                                "action": {
                                    "description": "The action details."
                                },
                                "score": {
                                    "type": "number",
                                    "description": "Score between 0 and 1."
                                },
                                "rationale": {
                                    "type": "string",
                                    "description": "Explanation for this candidate."
                                }
                            }
                        }
                    }
                },
                "required": ["agentId"]
            }),
        ),
        tool(
            "getCycleHistory",
            "Gets the history of decision cycles for the current run.",
            json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of cycles to retrieve."
                    }
                }
            }),
        ),
        // Skills
        tool(
            "trigger",
            "Triggers a registered skill or procedure by name.",
            json!({
                "type": "object",
                "properties": {
                    "skillName": {
                        "type": "string",
                        "description": "The name of the skill to trigger."
                    }
                },
                "required": ["skillName"]
            }),
        ),
    ]
});

/// OpenAI-style tool definitions, wrapping the same JSON Schemas
pub static OPENAI_TOOLS: Lazy<Vec<Value>> = Lazy::new(|| {
    ANTHROPIC_TOOLS
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema,
                }
            })
        })
        .collect()
});

/// Google Gemini-style tool definitions
///
/// Gemini spells type tags in uppercase and has no free-form value
/// type, so open-ended fields are declared STRING and carry JSON text.
pub static GOOGLE_TOOLS: Lazy<Vec<Value>> = Lazy::new(|| {
    vec![
        json!({
            "name": "focus",
            "description": "Stores a piece of information in short-term working memory (Flux).",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "content": {
                        "type": "STRING",
                        "description": "The information to focus on."
                    }
                },
                "required": ["content"]
            }
        }),
        json!({
            "name": "recall",
            "description": "Recalls relevant memories from long-term memory based on a query.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "query": {
                        "type": "STRING",
                        "description": "The query to search for."
                    }
                },
                "required": ["query"]
            }
        }),
        json!({
            "name": "remember",
            "description": "Stores information in long-term memory for future recall.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "content": {
                        "type": "STRING",
                        "description": "The information to remember."
                    }
                },
                "required": ["content"]
            }
        }),
        json!({
            "name": "setVariable",
            "description": "Sets a structured variable in working memory.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "name": {
                        "type": "STRING",
                        "description": "The name of the variable."
                    },
                    "value": {
                        "type": "STRING",
                        "description": "The value to store (JSON-encoded)."
                    },
                    "source": {
                        "type": "STRING",
                        "description": "Source of the variable: 'system', 'reasoning', 'retrieval', 'perception', or 'explicit'."
                    }
                },
                "required": ["name", "value"]
            }
        }),
        json!({
            "name": "getVariable",
            "description": "Gets a structured variable from working memory.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "name": {
                        "type": "STRING",
                        "description": "The name of the variable to retrieve."
                    }
                },
                "required": ["name"]
            }
        }),
        json!({
            "name": "listVariables",
            "description": "Lists all variables in working memory.",
            "parameters": {
                "type": "OBJECT",
                "properties": {}
            }
        }),
        json!({
            "name": "deleteVariable",
            "description": "Deletes a variable from working memory.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "name": {
                        "type": "STRING",
                        "description": "The name of the variable to delete."
                    }
                },
                "required": ["name"]
            }
        }),
        json!({
            "name": "addGoal",
            "description": "Adds a new goal to the agent's goal stack.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "description": {
                        "type": "STRING",
                        "description": "The description of the goal."
                    },
                    "priority": {
                        "type": "STRING",
                        "description": "Priority level: 'low', 'medium', 'high', or 'critical'."
                    },
                    "parentId": {
                        "type": "STRING",
                        "description": "Optional parent goal ID for hierarchical goals."
                    }
                },
                "required": ["description"]
            }
        }),
        json!({
            "name": "updateGoal",
            "description": "Updates the status of an existing goal.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "goalId": {
                        "type": "STRING",
                        "description": "The ID of the goal to update."
                    },
                    "status": {
                        "type": "STRING",
                        "description": "New status: 'active', 'suspended', 'achieved', 'abandoned', or 'failed'."
                    }
                },
                "required": ["goalId", "status"]
            }
        }),
        json!({
            "name": "listGoals",
            "description": "Lists all goals, optionally filtered by status.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "statusFilter": {
                        "type": "STRING",
                        "description": "Optional status to filter by."
                    }
                }
            }
        }),
        json!({
            "name": "submitAction",
            "description": "Submits an action for execution and logging.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "agentId": {
                        "type": "STRING",
                        "description": "The ID of the agent submitting the action."
                    },
                    "actionType": {
                        "type": "STRING",
                        "description": "Type of action: 'reason', 'retrieve', 'learn', or 'ground'."
                    },
                    "actionDetails": {
                        "type": "STRING",
                        "description": "The action details (JSON-encoded)."
                    }
                },
                "required": ["agentId", "actionType", "actionDetails"]
            }
        }),
        json!({
            "name": "getActionLog",
            "description": "Gets the action log for the current run.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "limit": {
                        "type": "NUMBER",
                        "description": "Maximum number of entries to retrieve."
                    },
                    "actionTypeFilter": {
                        "type": "STRING",
                        "description": "Optional action type to filter by."
                    }
                }
            }
        }),
        json!({
            "name": "drift",
            "description": "Reads the current items in short-term working memory (Flux).",
            "parameters": {
                "type": "OBJECT",
                "properties": {}
            }
        }),
        json!({
            "name": "defineConcept",
            "description": "Defines a concept with a JSON schema for structured knowledge.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "name": {
                        "type": "STRING",
                        "description": "The name of the concept."
                    },
                    "schema": {
                        "type": "STRING",
                        "description": "The JSON schema defining the concept structure (JSON-encoded)."
                    }
                },
                "required": ["name", "schema"]
            }
        }),
        json!({
            "name": "listConcepts",
            "description": "Lists all defined concepts and their schemas.",
            "parameters": {
                "type": "OBJECT",
                "properties": {}
            }
        }),
        json!({
            "name": "runCycle",
            "description": "Runs a decision cycle with optional action candidates.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "agentId": {
                        "type": "STRING",
                        "description": "The ID of the agent running the cycle."
                    },
                    "candidates": {
                        "type": "ARRAY",
                        "description": "Optional array of action candidates with scores.",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "actionType": {
                                    "type": "STRING",
                                    "description": "Type of action."
                                },
                                "action": {
                                    "type": "STRING",
                                    "description": "The action details (JSON-encoded)."
                                },
                                "score": {
                                    "type": "NUMBER",
                                    "description": "Score between 0 and 1."
                                },
                                "rationale": {
                                    "type": "STRING",
                                    "description": "Explanation for this candidate."
                                }
                            }
                        }
                    }
                },
                "required": ["agentId"]
            }
        }),
        json!({
            "name": "getCycleHistory",
            "description": "Gets the history of decision cycles for the current run.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "limit": {
                        "type": "NUMBER",
                        "description": "Maximum number of cycles to retrieve."
                    }
                }
            }
        }),
        json!({
            "name": "trigger",
            "description": "Triggers a registered skill or procedure by name.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "skillName": {
                        "type": "STRING",
                        "description": "The name of the skill to trigger."
                    }
                },
                "required": ["skillName"]
            }
        }),
    ]
});
