//! Prompt assembly for the intent classifier and the response generators.

use maitre_rs_protocol::{ConversationTurn, Role};

/// Marker used in the router prompt when the transcript is empty.
pub(crate) const EMPTY_HISTORY_MARKER: &str = "No conversation history yet.";

/// Render transcript turns as `USER:`/`ASSISTANT:` lines for the router.
pub(crate) fn format_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY_MARKER.to_string();
    }
    history
        .iter()
        .map(|turn| {
            let label = match turn.role {
                Role::User => "USER",
                Role::Assistant => "ASSISTANT",
            };
            format!("{label}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the strict intent-classification prompt for one utterance.
pub(crate) fn build_router_prompt(utterance: &str, history: &[ConversationTurn]) -> String {
    let formatted_history = format_history(history);
    format!(
        "You are a restaurant chatbot assistant classifying user intent.\n\n\
**ABSOLUTE RULES - APPLY THESE FIRST:**\n\
1.  If the user message is a simple, standalone greeting (e.g., \"hello\", \"hi\"), the intent is GREETING.\n\
2.  If the user message is asking *about the conversation itself* (e.g., \"what did I ask?\", \"what was my last message?\", \"what did we talk about?\"), the intent is HISTORY, regardless of the topic of previous messages.\n\n\
**Conversation History:**\n\
{formatted_history}\n\n\
**Current User Message:** \"{utterance}\"\n\n\
Given the user message, conversation history, and the absolute rules, classify the intent into ONE of the following:\n\
- GREETING: A simple greeting. **Must follow Absolute Rule 1.**\n\
- HISTORY: A question *about* the conversation history or previous messages/orders. **Must follow Absolute Rule 2.**\n\
- MENU: Asking about menu items/prices/descriptions. *Excludes questions about what was previously discussed.*\n\
- ORDER: Requesting to create, modify, review, or cancel an order. *Excludes questions about previous orders already discussed.*\n\
- END: Ending the conversation (e.g., \"bye\", \"thank you\").\n\
- IRRELEVANT: Any other topic not covered above.\n\n\
Output Instructions:\n\
1. Return STRICTLY a JSON object with keys \"intent\" and \"response\".\n\
2. For GREETING or HISTORY intents: Set the correct \"intent\". Provide a **concise** response text (under 320 characters) in the \"response\" field. Use the provided Conversation History context to answer HISTORY questions accurately. Summarize if necessary and offer to provide more detail if relevant.\n\
3. For IRRELEVANT intent: Set \"intent\" to \"IRRELEVANT\". Provide a **concise**, empathetic refusal/explanation (under 320 characters) in the \"response\" field.\n\
4. For MENU, ORDER, or END intents: Set the correct \"intent\" and set \"response\" to an empty string (\"\").\n\n\
Examples (History examples assume relevant context was in the provided history):\n\
User message: \"hello\"\n\
Output: {{\"intent\": \"GREETING\", \"response\": \"Hello! How can I help with the menu or your order?\"}}\n\n\
User message: \"What drinks do you have?\"\n\
Output: {{\"intent\": \"MENU\", \"response\": \"\"}}\n\n\
User message: \"what did I ask before this?\"\n\
Output: {{\"intent\": \"HISTORY\", \"response\": \"You previously asked about our sandwich options. Need more details on those, or can I help with something else?\"}}\n\n\
User message: \"What was my previous message?\"\n\
Output: {{\"intent\": \"HISTORY\", \"response\": \"Your previous message was asking about drinks. Anything else I can help with?\"}}\n\n\
User message: \"what was the first thing I asked?\"\n\
Output: {{\"intent\": \"HISTORY\", \"response\": \"Looks like your first message was 'Hello'. How can I help now?\"}}\n\n\
User message: \"what did I order last time?\"\n\
Output: {{\"intent\": \"HISTORY\", \"response\": \"We discussed you ordering pizza previously. Want to order that now or see the menu again?\"}}\n\n\
User message: \"tell me a joke\"\n\
Output: {{\"intent\": \"IRRELEVANT\", \"response\": \"Sorry, I can't tell jokes! I'm here for menu questions or orders. Can I help with that?\"}}\n\n\
User message: \"thanks bye\"\n\
Output: {{\"intent\": \"END\", \"response\": \"\"}}\n\n\
Ensure no extra text before or after the JSON object."
    )
}

/// Instruction block for the menu handler, with the full menu appended.
pub(crate) fn build_menu_instructions(menu_text: &str) -> String {
    format!(
        "You are a helpful restaurant assistant providing information about menu items.\n\
Respond concisely, like a text message (under 320 characters).\n\
Summarize information where possible, especially if the user asks for general categories or multiple items.\n\
**Use the provided conversation history to understand the context and avoid repeating information unnecessarily.**\n\n\
**Handling Follow-up for \"More Details\":**\n\
- If the user asks for \"more details\" after you've provided a summary, look at your *immediately preceding message* in the history.\n\
- Identify the items you summarized in that message.\n\
- Provide the *additional* details (like descriptions, options, ingredients) for *only those items*.\n\
- Do NOT repeat the item names and prices from the summary unless essential for context (e.g., listing options with price modifiers).\n\
- Keep the response concise and under the character limit.\n\n\
Be friendly and informative about prices and descriptions.\n\
Use standard text formatting. Avoid complex markdown. Use bold (**) for item names only.\n\
The complete menu is as follows:\n\
{menu_text}"
    )
}

/// Instruction block for the order handler, with the full menu appended.
pub(crate) fn build_order_instructions(menu_text: &str) -> String {
    format!(
        "You are an assistant helping with food orders.\n\
Respond concisely, like a text message (under 320 characters).\n\
**Use the provided conversation history to understand the current order status and context.**\n\
Be clear about prices and options. Summarize complex orders or options if necessary.\n\
Offer to provide more detail if needed.\n\
If they want something not on the menu, politely inform them it's unavailable.\n\n\
In addition to your text response, you must also manage and return the user's cart state.\n\
You need to parse the user's intent and:\n\
1. For \"add\" - add items to the cart\n\
2. For \"remove\" - remove items from the cart\n\
3. For \"change\" - modify existing items (e.g., change quantity, options)\n\
4. For \"upgrade\" - upgrade items (e.g., size, add-ons)\n\
5. For \"cancel order\" - empty the cart\n\
6. For \"make order\" - finalize the cart\n\n\
When responding, output BOTH:\n\
1. A conversational text message acknowledging the user's action\n\
2. A valid JSON representation of their updated cart\n\n\
The cart should be a JSON array of objects with properties:\n\
- \"item\": string - the menu item name\n\
- \"quantity\": number - how many of this item\n\
- \"options\": array of strings - any options/modifications\n\
- \"price\": number - the unit price of this item including options\n\n\
FORMAT:\n\
{{\n\
  \"response\": \"Your natural language response here\",\n\
  \"cart\": []\n\
}}\n\n\
Based on the menu information and the user's request, help them place or modify their order.\n\
The complete menu is as follows:\n\
{menu_text}"
    )
}

/// Instruction block for the farewell handler.
pub(crate) fn build_farewell_instructions() -> String {
    "The user seems to be ending the conversation.\n\
**Consider the conversation history for context if appropriate (e.g., thanking them for an order).**\n\
Respond with a friendly, concise goodbye message (under 320 characters) that invites them to return."
        .to_string()
}
