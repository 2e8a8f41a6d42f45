use super::*;

fn sum3((a, b, c): (i32, i32, i32)) -> i32 {
    a + b + c
}

#[test]
fn absent_callback_returns_none() {
    let wrapped = wrap_optional::<(i32, i32, i32), i32>(None);
    assert_eq!(wrapped.call((1, 2, 3)), None);
}

#[test]
fn present_callback_is_forwarded() {
    let wrapped = wrap_optional(Some(Callback::new(sum3)));
    assert_eq!(wrapped.call((1, 2, 3)), Some(sum3((1, 2, 3))));
}
