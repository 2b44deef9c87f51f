use comadrelab_core::controllers::contact::{SubmitError, SubmitRequest, check_status};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, HtmlFormElement, Request, RequestInit, Response, Window};

/// POST the form's fields and classify the outcome. Any thrown JS error,
/// including a network failure, becomes `SubmitError::Transport`.
pub async fn submit_form(
    window: &Window,
    form: &HtmlFormElement,
    request: &SubmitRequest,
) -> Result<(), SubmitError> {
    let status = send(window, form, request).await.map_err(transport)?;
    check_status(status)
}

async fn send(
    window: &Window,
    form: &HtmlFormElement,
    request: &SubmitRequest,
) -> Result<u16, JsValue> {
    let body = FormData::new_with_form(form)?;

    let headers = Headers::new()?;
    headers.set("Accept", &request.accept)?;

    let init = RequestInit::new();
    init.set_method(request.method);
    init.set_body(&body);
    init.set_headers(&headers);

    let req = Request::new_with_str_and_init(&request.url, &init)?;
    let resp_value = JsFuture::from(window.fetch_with_request(&req)).await?;
    let resp: Response = resp_value.dyn_into()?;
    Ok(resp.status())
}

fn transport(e: JsValue) -> SubmitError {
    let msg = e
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{e:?}"));
    SubmitError::Transport(msg)
}
