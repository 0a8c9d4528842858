//! Order confirmation email content, shared by every channel.

use dokan_core::Order;

/// Rendered confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

/// Renders the confirmation for `order`, addressed to the customer.
pub fn order_confirmation(order: &Order) -> EmailMessage {
    EmailMessage {
        to: order.customer.email.clone(),
        subject: format!("Order Confirmation - {}", order.order_number),
        body_text: render_text(order),
        body_html: render_html(order),
    }
}

fn render_text(order: &Order) -> String {
    let mut out = format!(
        "Thank you for your order, {}!\n\nOrder number: {}\n\nItems:\n",
        order.customer.name, order.order_number
    );

    for item in &order.items {
        out.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            item.quantity,
            item.name,
            item.price_at_time(),
            item.line_total()
        ));
    }

    out.push_str(&format!("\nSubtotal: {}\n", order.subtotal()));
    if let Some(code) = order.discount_code.as_deref() {
        out.push_str(&format!("Discount ({}): -{}\n", code, order.discount_amount()));
    }
    out.push_str(&format!(
        "Shipping ({}): {}\nTotal: {}\n\nDeliver to: {}, {}, {}\nPhone: {}\n",
        order.shipping_method.label(),
        order.shipping_cost(),
        order.total(),
        order.customer.full_address,
        order.customer.thana,
        order.customer.district,
        order.customer.phone
    ));

    out
}

fn render_html(order: &Order) -> String {
    let rows: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&item.name),
                item.quantity,
                item.price_at_time(),
                item.line_total()
            )
        })
        .collect();

    let discount_row = match order.discount_code.as_deref() {
        Some(code) => summary_row(
            &format!("Discount ({})", escape(code)),
            &format!("-{}", order.discount_amount()),
        ),
        None => String::new(),
    };

    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Thank you for your order, {name}!</h2>
    <p>Order number: <strong>{number}</strong></p>
    <table>
      <tr><th>Item</th><th>Qty</th><th>Price</th><th>Total</th></tr>
      {rows}
    </table>
    <table>
      {subtotal}{discount}{shipping}{total}
    </table>
    <p>Deliver to: {address}, {thana}, {district}<br/>Phone: {phone}</p>
  </body>
</html>"#,
        name = escape(&order.customer.name),
        number = escape(&order.order_number),
        rows = rows,
        subtotal = summary_row("Subtotal", &order.subtotal().to_string()),
        discount = discount_row,
        shipping = summary_row(
            &format!("Shipping ({})", escape(order.shipping_method.label())),
            &order.shipping_cost().to_string()
        ),
        total = summary_row("Total", &order.total().to_string()),
        address = escape(&order.customer.full_address),
        thana = escape(&order.customer.thana),
        district = escape(&order.customer.district),
        phone = escape(&order.customer.phone),
    )
}

fn summary_row(label: &str, amount: &str) -> String {
    format!("<tr><td>{label}</td><td>{amount}</td></tr>")
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
