pub fn format_fee_amount(minor_units: u64, decimals: u32) -> String {
	format!(
		"{:.*}",
		decimals as usize,
		minor_units as f64 / 10f64.powi(decimals as i32)
	)
}
