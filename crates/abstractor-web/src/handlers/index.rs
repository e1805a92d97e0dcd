pub async fn index() -> &'static str {
    "API is running. Use /extract-abstract or /forminator-webhook."
}
